//! Canvas-2D renderer
//!
//! Paints the current simulation state; never mutates it. Sprites and the
//! backdrop load asynchronously, so every asset has a wireframe or flat-fill
//! fallback and the draw order degrades gracefully:
//! video -> still image -> flat fill for the background, image -> wireframe
//! for the craft sprites.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, HtmlVideoElement,
};

use crate::consts::{FIELD_H, FIELD_W};
use crate::sim::{Enemy, GameState, Level};

const RADAR_SIZE: f64 = 150.0;
const RADAR_MARGIN: f64 = 20.0;
const RADAR_SCALE: f64 = 0.1;

/// Asynchronously loading presentation assets
pub struct Assets {
    pub background_video: Option<HtmlVideoElement>,
    pub background_image: Option<HtmlImageElement>,
    pub player_image: Option<HtmlImageElement>,
    pub enemy_image: Option<HtmlImageElement>,
}

impl Assets {
    /// Kick off loads; the renderer polls readiness every frame
    pub fn load(document: &Document) -> Self {
        let background_video = document
            .get_element_by_id("bg-video")
            .and_then(|el| el.dyn_into::<HtmlVideoElement>().ok());
        if background_video.is_none() {
            log::warn!("no #bg-video element; falling back to image backdrop");
        }

        Self {
            background_video,
            background_image: load_image(document, "img/backdrop.png"),
            player_image: load_image(document, "img/player.png"),
            enemy_image: load_image(document, "img/enemy.png"),
        }
    }
}

fn load_image(document: &Document, src: &str) -> Option<HtmlImageElement> {
    let img = document
        .create_element("img")
        .ok()?
        .dyn_into::<HtmlImageElement>()
        .ok()?;
    img.set_src(src);
    Some(img)
}

fn image_ready(img: &HtmlImageElement) -> bool {
    img.complete() && img.natural_width() > 0
}

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
    assets: Assets,
}

impl Renderer {
    pub fn new(canvas: &HtmlCanvasElement, assets: Assets) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx, assets })
    }

    /// Paint one frame of the given state
    pub fn draw(&self, state: &GameState) {
        self.draw_background();
        self.draw_grid();
        self.draw_obstacles(state);
        self.draw_bullets(state);
        for enemy in &state.enemies {
            self.draw_enemy(enemy);
        }
        if state.level >= Level::Three {
            self.draw_enemy_bullets(state);
        }
        self.draw_player(state);
        self.draw_player_ring(state);
        self.draw_crosshair(state.pointer);
        self.draw_banner(state);
        self.draw_radar(state);
    }

    fn draw_background(&self) {
        let ctx = &self.ctx;
        if let Some(video) = &self.assets.background_video
            && video.ready_state() >= 2
        {
            let _ = ctx.draw_image_with_html_video_element_and_dw_and_dh(
                video,
                0.0,
                0.0,
                FIELD_W as f64,
                FIELD_H as f64,
            );
            return;
        }
        if let Some(img) = &self.assets.background_image
            && image_ready(img)
        {
            let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                0.0,
                0.0,
                FIELD_W as f64,
                FIELD_H as f64,
            );
            return;
        }
        ctx.set_fill_style_str("#000");
        ctx.fill_rect(0.0, 0.0, FIELD_W as f64, FIELD_H as f64);
    }

    /// Faint retro grid
    fn draw_grid(&self) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_global_alpha(0.06);
        ctx.set_stroke_style_str("#00ff880c");
        ctx.set_line_width(1.0);
        let step = 36.0;
        let mut x = 0.0;
        while x < FIELD_W as f64 {
            ctx.begin_path();
            ctx.move_to(x, 0.0);
            ctx.line_to(x, FIELD_H as f64);
            ctx.stroke();
            x += step;
        }
        let mut y = 0.0;
        while y < FIELD_H as f64 {
            ctx.begin_path();
            ctx.move_to(0.0, y);
            ctx.line_to(FIELD_W as f64, y);
            ctx.stroke();
            y += step;
        }
        ctx.restore();
    }

    fn draw_obstacles(&self, state: &GameState) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_global_alpha(0.16);
        ctx.set_stroke_style_str("#33ff66");
        ctx.set_line_width(1.0);
        for r in &state.obstacles {
            ctx.stroke_rect(r.x as f64, r.y as f64, r.w as f64, r.h as f64);
        }
        ctx.restore();
    }

    /// Player bullets as short strokes aligned with their velocity
    fn draw_bullets(&self, state: &GameState) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_stroke_style_str("#ccffcc");
        ctx.set_line_width(2.0);
        for b in &state.bullets {
            ctx.begin_path();
            ctx.move_to((b.pos.x - b.vel.x * 0.30) as f64, (b.pos.y - b.vel.y * 0.30) as f64);
            ctx.line_to((b.pos.x + b.vel.x * 0.30) as f64, (b.pos.y + b.vel.y * 0.30) as f64);
            ctx.stroke();
        }
        ctx.restore();
    }

    /// Enemy bullets as small orange dots
    fn draw_enemy_bullets(&self, state: &GameState) {
        if state.enemy_bullets.is_empty() {
            return;
        }
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_fill_style_str("#ffb86b");
        for b in &state.enemy_bullets {
            ctx.begin_path();
            let _ = ctx.arc(b.pos.x as f64, b.pos.y as f64, 3.0, 0.0, TAU);
            ctx.fill();
        }
        ctx.restore();
    }

    fn draw_enemy(&self, enemy: &Enemy) {
        let ctx = &self.ctx;
        ctx.save();
        let _ = ctx.translate(enemy.pos.x as f64, enemy.pos.y as f64);
        // Sprite art points "up"; rotate so it faces the travel direction
        let _ = ctx.rotate(enemy.angle as f64 - FRAC_PI_2);

        if let Some(img) = &self.assets.enemy_image
            && image_ready(img)
        {
            let w = img.width() as f64 * 0.06;
            let h = img.height() as f64 * 0.06;
            let _ = ctx
                .draw_image_with_html_image_element_and_dw_and_dh(img, -w / 2.0, -h / 2.0, w, h);
        } else {
            let size = enemy.size as f64;
            ctx.set_stroke_style_str("#66ff88");
            ctx.set_line_width(1.8);
            ctx.begin_path();
            ctx.move_to(-size * 0.6, -size * 0.45);
            ctx.line_to(size * 0.7, 0.0);
            ctx.line_to(-size * 0.6, size * 0.45);
            ctx.close_path();
            ctx.stroke();
        }
        ctx.restore();
    }

    fn draw_player(&self, state: &GameState) {
        let ctx = &self.ctx;
        let player = &state.player;
        ctx.save();
        let _ = ctx.translate(player.pos.x as f64, player.pos.y as f64);
        let _ = ctx.rotate(player.angle as f64);

        if let Some(img) = &self.assets.player_image
            && image_ready(img)
        {
            let w = img.width() as f64 * 0.08;
            let h = img.height() as f64 * 0.08;
            let _ = ctx
                .draw_image_with_html_image_element_and_dw_and_dh(img, -w / 2.0, -h / 2.0, w, h);
        } else {
            let size = player.size as f64;
            ctx.set_stroke_style_str("#88aaff");
            ctx.set_line_width(2.0);
            ctx.begin_path();
            ctx.rect(-size * 0.5, -size * 0.4, size, size * 0.8);
            ctx.stroke();
        }
        ctx.restore();
    }

    /// Faint ring around the player
    fn draw_player_ring(&self, state: &GameState) {
        let ctx = &self.ctx;
        let player = &state.player;
        ctx.save();
        let _ = ctx.translate(player.pos.x as f64, player.pos.y as f64);
        ctx.set_global_alpha(0.2);
        ctx.begin_path();
        let _ = ctx.arc(0.0, 0.0, player.size as f64 * 2.0, 0.0, TAU);
        ctx.set_stroke_style_str("#66ff88");
        ctx.set_line_width(1.2);
        ctx.stroke();
        ctx.restore();
    }

    fn draw_crosshair(&self, pointer: Vec2) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_stroke_style_str("#00ff88");
        ctx.set_line_width(1.4);
        let size = 20.0;
        let (x, y) = (pointer.x as f64, pointer.y as f64);
        ctx.begin_path();
        ctx.move_to(x - size, y);
        ctx.line_to(x + size, y);
        ctx.move_to(x, y - size);
        ctx.line_to(x, y + size);
        ctx.stroke();
        ctx.restore();
    }

    /// Level-up banner, fading out over its last three seconds
    fn draw_banner(&self, state: &GameState) {
        if !state.banner.visible() {
            return;
        }
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_global_alpha(state.banner.opacity() as f64);
        ctx.set_fill_style_str("#00ff66");
        ctx.set_font("28px monospace");
        ctx.set_text_align("center");
        let _ = ctx.fill_text(&state.banner.text, FIELD_W as f64 / 2.0, 60.0);
        ctx.restore();
    }

    /// Radar inset: player at the center, nearby enemies as scaled offsets
    fn draw_radar(&self, state: &GameState) {
        let ctx = &self.ctx;
        let x = FIELD_W as f64 - RADAR_SIZE - RADAR_MARGIN;
        let y = FIELD_H as f64 - RADAR_SIZE - RADAR_MARGIN;
        let cx = x + RADAR_SIZE / 2.0;
        let cy = y + RADAR_SIZE / 2.0;

        ctx.save();

        ctx.begin_path();
        let _ = ctx.arc(cx, cy, RADAR_SIZE / 2.0, 0.0, TAU);
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
        ctx.fill();
        ctx.set_stroke_style_str("lime");
        ctx.set_line_width(2.0);
        ctx.stroke();

        ctx.set_fill_style_str("cyan");
        ctx.begin_path();
        let _ = ctx.arc(cx, cy, 4.0, 0.0, TAU);
        ctx.fill();

        for enemy in &state.enemies {
            let dx = (enemy.pos.x - state.player.pos.x) as f64 * RADAR_SCALE;
            let dy = (enemy.pos.y - state.player.pos.y) as f64 * RADAR_SCALE;
            if (dx * dx + dy * dy).sqrt() < RADAR_SIZE / 2.0 {
                ctx.set_fill_style_str("red");
                ctx.begin_path();
                let _ = ctx.arc(cx + dx, cy + dy, 3.0, 0.0, TAU);
                ctx.fill();
            }
        }

        ctx.restore();
    }
}
