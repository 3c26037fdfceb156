//! Matrix-rain overlay: a set of falling glyph trails advanced by an
//! explicit [`RainSession::tick`]. The caller's scheduler owns the cadence;
//! the session owns the Drop list and a seeded RNG, so a whole animation is
//! reproducible from (seed, tick sequence).
//!
//! The fading-trail look comes from under-painting the whole surface with
//! low-alpha black every rendered frame instead of tracking per-pixel decay.

use crate::{
    palette::luminance,
    raster::{RasterBuffer, Rgba},
    surface::Surface,
};

const MATRIX_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyz0123456789@#$%^&*()ﾊﾐﾋｰｳｼﾅﾓﾆｻﾜﾂｵﾘｱﾎﾃﾏｹﾒｴｶｷﾑﾕﾗｾﾈｽﾀﾇﾍ";

/// Minimum glyphs in a trail; the random roll adds on top of this.
const MIN_TRAIL: usize = 5;

/// Per-glyph probability of being replaced by a fresh random glyph per frame.
const MUTATION_CHANCE: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RainSettings {
    pub speed: f32,
    pub density: f32,
    pub trail_length: u32,
    pub font_size: f32,
}

impl Default for RainSettings {
    fn default() -> Self {
        Self {
            speed: 5.0,
            density: 0.05,
            trail_length: 15,
            font_size: 14.0,
        }
    }
}

/// One falling glyph trail. `glyphs[0]` is the head; `head_y` is fractional
/// and monotonically non-decreasing until the drop is removed.
#[derive(Clone, Debug)]
pub struct Drop {
    pub column: u32,
    pub head_y: f32,
    pub speed: f32,
    pub glyphs: Vec<char>,
}

pub struct RainSession {
    width: u32,
    height: u32,
    cols: u32,
    rows: u32,
    settings: RainSettings,
    drops: Vec<Drop>,
    rng: fastrand::Rng,
    backing: Option<RasterBuffer>,
    glyph_pool: Vec<char>,
    since_last_frame_ms: f64,
}

impl RainSession {
    /// Seeds the initial Drop set: each column is rolled independently with
    /// probability `density * 3`.
    pub fn new(
        width: u32,
        height: u32,
        settings: RainSettings,
        backing: Option<RasterBuffer>,
        seed: u64,
    ) -> Self {
        let cols = (width as f32 / (settings.font_size * 0.6)).floor() as u32;
        let rows = (height as f32 / settings.font_size).floor() as u32;
        let mut session = Self {
            width,
            height,
            cols,
            rows,
            settings,
            drops: Vec::new(),
            rng: fastrand::Rng::with_seed(seed),
            backing,
            glyph_pool: MATRIX_CHARS.chars().collect(),
            since_last_frame_ms: f64::INFINITY,
        };
        for x in 0..session.cols {
            if session.rng.f32() < session.settings.density * 3.0 {
                let drop = session.spawn_drop(x);
                session.drops.push(drop);
            }
        }
        session
    }

    pub fn drops(&self) -> &[Drop] {
        &self.drops
    }

    pub fn grid(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    fn random_glyph(&mut self) -> char {
        self.glyph_pool[self.rng.usize(0..self.glyph_pool.len())]
    }

    fn spawn_drop(&mut self, column: u32) -> Drop {
        let extra = self.settings.trail_length.max(1);
        let len = self.rng.usize(0..extra as usize) + MIN_TRAIL;
        let glyphs = (0..len).map(|_| self.random_glyph()).collect();
        Drop {
            column,
            head_y: -(self.rng.u32(0..self.rows.max(1)) as f32),
            speed: 0.5 + self.rng.f32() * 1.5,
            glyphs,
        }
    }

    /// Advances the animation by `elapsed_ms`. Frames are gated so the
    /// effective cadence scales with the speed setting rather than the
    /// caller's tick rate; returns whether a frame was rendered.
    pub fn tick(&mut self, target: &mut dyn Surface, elapsed_ms: f64) -> bool {
        self.since_last_frame_ms += elapsed_ms;
        let gate = 50.0 / (f64::from(self.settings.speed) * 0.5);
        if self.since_last_frame_ms <= gate {
            return false;
        }
        self.since_last_frame_ms = 0.0;
        self.render(target);
        true
    }

    fn render(&mut self, target: &mut dyn Surface) {
        let font_size = self.settings.font_size;
        let cell_w = font_size * 0.6;

        // Low-alpha under-paint produces the trailing fade.
        target.set_fill(Rgba::new(0, 0, 0, 26));
        target.fill_rect(0.0, 0.0, self.width as f32, self.height as f32);

        for x in 0..self.cols {
            if self.rng.f32() < self.settings.density * 0.3 {
                let drop = self.spawn_drop(x);
                self.drops.push(drop);
            }
        }

        for i in 0..self.drops.len() {
            let head = self.drops[i].head_y.floor() as i64;
            let len = self.drops[i].glyphs.len();
            for j in 0..len {
                let cy = head - j as i64;
                if cy < 0 || cy >= i64::from(self.rows) {
                    continue;
                }
                let column = self.drops[i].column;
                let px = (column as f32 * cell_w).floor();
                let py = cy as f32 * font_size;

                let mut green = 255.0f32;
                if let Some(backing) = &self.backing {
                    let bw = backing.width();
                    let bh = backing.height();
                    if bw > 0 && bh > 0 {
                        let sx = (((column as f32 / self.cols as f32) * bw as f32).floor() as u32)
                            .min(bw - 1);
                        let sy = (((cy as f32 / self.rows as f32) * bh as f32).floor() as u32)
                            .min(bh - 1);
                        let c = backing.rgb_at(sx, sy);
                        let lum = luminance(c.r, c.g, c.b) / 255.0;
                        green = (80.0 + lum * 175.0).floor();
                    }
                }

                if j == 0 {
                    target.set_fill(Rgba::WHITE);
                } else {
                    let fade = 1.0 - j as f32 / len as f32;
                    target.set_fill(Rgba::new(
                        0,
                        (green * fade).floor() as u8,
                        0,
                        (fade * 255.0).round() as u8,
                    ));
                }

                if self.rng.f32() < MUTATION_CHANCE {
                    let g = self.random_glyph();
                    self.drops[i].glyphs[j] = g;
                }
                let ch = self.drops[i].glyphs[j];
                target.draw_glyph(ch, px, py, font_size);
            }

            let drop = &mut self.drops[i];
            drop.head_y += drop.speed;
        }

        let rows = i64::from(self.rows);
        self.drops
            .retain(|d| d.head_y.floor() as i64 - d.glyphs.len() as i64 <= rows);
    }
}
