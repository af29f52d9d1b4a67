use evo_drive::simulation::episode::Episode;
use evo_drive::simulation::params::Params;
use geo::Point;
use macroquad::prelude::*;
use ndarray::Array1;

const RADAR_COLOR: Color = Color::new(0.0, 1.0, 0.0, 1.0);

trait ToScreen {
    type Output;
    fn to_screen(&self, params: &Params) -> Self::Output;
}

fn screen_scale(params: &Params) -> (f32, f32) {
    (
        screen_width() / params.screen_width,
        screen_height() / params.screen_height,
    )
}

impl ToScreen for Array1<f32> {
    type Output = Vec2;
    fn to_screen(&self, params: &Params) -> Vec2 {
        let (scale_x, scale_y) = screen_scale(params);
        vec2(self[0] * scale_x, self[1] * scale_y)
    }
}

impl ToScreen for Point<f32> {
    type Output = Vec2;
    fn to_screen(&self, params: &Params) -> Vec2 {
        let (scale_x, scale_y) = screen_scale(params);
        vec2(self.x() * scale_x, self.y() * scale_y)
    }
}

impl ToScreen for f32 {
    type Output = f32;
    fn to_screen(&self, params: &Params) -> f32 {
        let (scale_x, scale_y) = screen_scale(params);
        self * scale_x.min(scale_y)
    }
}

pub fn draw_track(track: &Texture2D, params: &Params) {
    let (scale_x, scale_y) = screen_scale(params);
    draw_texture_ex(
        track,
        0.0,
        0.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(track.width() * scale_x, track.height() * scale_y)),
            ..Default::default()
        },
    );
}

pub fn draw_cars(episode: &Episode, sprite: &Texture2D, params: &Params, show_radars: bool) {
    let (scale_x, scale_y) = screen_scale(params);

    episode.cars().iter().filter(|car| car.is_alive()).for_each(|car| {
        let screen_pos = car.pos.to_screen(params);

        // pygame-style headings turn counter-clockwise, macroquad rotates clockwise
        draw_texture_ex(
            sprite,
            screen_pos.x,
            screen_pos.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(params.car_width * scale_x, params.car_height * scale_y)),
                rotation: -car.angle.to_radians(),
                ..Default::default()
            },
        );

        if show_radars {
            let center = car.center.to_screen(params);
            for radar in &car.radars {
                let end = radar.end.to_screen(params);
                draw_line(center.x, center.y, end.x, end.y, 1.0, RADAR_COLOR);
                draw_circle(end.x, end.y, 5.0f32.to_screen(params), RADAR_COLOR);
            }
        }
    });
}

fn draw_centered_text(text: &str, world_x: f32, world_y: f32, font_size: f32, params: &Params) {
    let font_size = font_size.to_screen(params).max(8.0);
    let anchor = Array1::from_vec(vec![world_x, world_y]).to_screen(params);
    let text_size = measure_text(text, None, font_size as u16, 1.0);
    draw_text(
        text,
        anchor.x - text_size.width / 2.0,
        anchor.y + text_size.height / 2.0,
        font_size,
        BLACK,
    );
}

pub fn draw_overlay(generation: u32, still_alive: usize, params: &Params) {
    draw_centered_text(
        &format!("Generation: {generation}"),
        900.0,
        450.0,
        30.0,
        params,
    );
    draw_centered_text(
        &format!("Still Alive: {still_alive}"),
        900.0,
        490.0,
        20.0,
        params,
    );
}

/// Sleeps for whatever is left of the frame budget.
pub fn limit_frame_rate(frame_start: f64, fps: u32) {
    let budget = 1.0 / f64::from(fps);
    let remaining = budget - (get_time() - frame_start);
    if remaining > 0.0 {
        std::thread::sleep(std::time::Duration::from_secs_f64(remaining));
    }
}
