//! Frame orchestration: resolves which transform to run, rescales the
//! source, and drives the animation loop for continuously-updating sources.
//!
//! Exactly one animated loop may be active per rendering surface. The
//! [`AnimationDriver`] enforces the cancel-before-start ordering: `start_*`
//! unconditionally stops the previous loop and clears its state before the
//! new one exists, and `stop` is synchronous and idempotent. There is one
//! logical writer at a time by construction, so no locking is involved.

use crate::{
    ascii::render_ascii,
    error::{RasterfxError, RasterfxResult},
    fx::{apply_buffer_effect, EffectKind, EffectSettings},
    halftone::halftone,
    media::LoadedMedia,
    rain::RainSession,
    raster::RasterBuffer,
    surface::Surface,
};

/// Applies the caller-supplied uniform scale factor ahead of any effect.
/// Scale 1 bypasses resampling entirely.
pub fn scale_source(src: &RasterBuffer, scale: f32) -> RasterBuffer {
    if scale == 1.0 {
        return src.clone();
    }
    let w = (src.width() as f32 * scale).round() as u32;
    let h = (src.height() as f32 * scale).round() as u32;
    src.resample_nearest(w, h)
}

/// Renders one frame of any non-animated effect onto `target`, returning the
/// ASCII transcript when the effect produces one.
#[tracing::instrument(skip(src, target, settings), fields(effect = kind.id()))]
pub fn render_frame(
    kind: EffectKind,
    src: &RasterBuffer,
    target: &mut dyn Surface,
    settings: &EffectSettings,
    scale: f32,
) -> RasterfxResult<Option<String>> {
    let scaled = scale_source(src, scale);
    match kind {
        EffectKind::Ascii => {
            let (tw, th) = (target.width(), target.height());
            let text = render_ascii(&scaled, target, tw, th, &settings.ascii);
            Ok(Some(text))
        }
        EffectKind::Halftone => {
            halftone(&scaled, target, &settings.halftone);
            Ok(None)
        }
        EffectKind::MatrixRain => Err(RasterfxError::animation(
            "matrix-rain is driven through AnimationDriver, not render_frame",
        )),
        _ => {
            let out = apply_buffer_effect(kind, &scaled, settings)?;
            target.put_raster(&out);
            Ok(None)
        }
    }
}

enum ActiveEffect {
    Rain(RainSession),
    /// A static effect re-applied to every frame pulled from an animated
    /// source.
    Replay {
        kind: EffectKind,
        settings: EffectSettings,
        scale: f32,
        clock_ms: f64,
    },
}

/// Owns the single animated loop of a rendering surface.
#[derive(Default)]
pub struct AnimationDriver {
    active: Option<ActiveEffect>,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Cancels the active loop and clears its animation-local state. Safe to
    /// call when already idle, any number of times.
    pub fn stop(&mut self) {
        if self.active.take().is_some() {
            tracing::debug!("animation loop stopped");
        }
    }

    /// Starts the matrix-rain overlay. A running loop is stopped first.
    pub fn start_rain(
        &mut self,
        width: u32,
        height: u32,
        settings: &EffectSettings,
        backing: Option<RasterBuffer>,
        seed: u64,
    ) {
        self.stop();
        self.active = Some(ActiveEffect::Rain(RainSession::new(
            width,
            height,
            settings.matrix_rain,
            backing,
            seed,
        )));
    }

    /// Starts re-applying a static effect to a continuously-updating source.
    /// A running loop is stopped first.
    pub fn start_replay(
        &mut self,
        kind: EffectKind,
        settings: EffectSettings,
        scale: f32,
    ) -> RasterfxResult<()> {
        if kind.is_animated() {
            return Err(RasterfxError::animation(
                "animated effects start through start_rain",
            ));
        }
        self.stop();
        self.active = Some(ActiveEffect::Replay {
            kind,
            settings,
            scale,
            clock_ms: 0.0,
        });
        Ok(())
    }

    /// Advances the active loop by `elapsed_ms`. Replay loops pull the
    /// current frame from `media`; the rain loop needs none (its backing
    /// raster was captured at start). Returns the ASCII transcript when the
    /// frame produced one.
    pub fn tick(
        &mut self,
        target: &mut dyn Surface,
        elapsed_ms: f64,
        media: Option<&LoadedMedia>,
    ) -> RasterfxResult<Option<String>> {
        match &mut self.active {
            None => Err(RasterfxError::animation("tick on an idle driver")),
            Some(ActiveEffect::Rain(session)) => {
                session.tick(target, elapsed_ms);
                Ok(None)
            }
            Some(ActiveEffect::Replay {
                kind,
                settings,
                scale,
                clock_ms,
            }) => {
                let media = media
                    .ok_or_else(|| RasterfxError::animation("replay loop needs a media source"))?;
                *clock_ms += elapsed_ms;
                let frame = media.current_frame(*clock_ms as u64);
                render_frame(*kind, frame, target, settings, *scale)
            }
        }
    }
}
