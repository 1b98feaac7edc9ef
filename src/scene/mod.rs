//! Scene composition
//!
//! Turns the game's current state into draw calls on a `DrawSurface`, in
//! logical playfield coordinates (1600x800, +y down). Render order during play:
//! sky, clouds, ground, obstacles, character, score overlay, state overlay.

pub mod draw;
pub mod font;

use glam::Vec2;

pub use draw::{Color, DrawCmd, DrawList, DrawSurface, TextAlign, palette};

use crate::assets::Sprite;
use crate::consts::VERSION;
use crate::game::{Game, ScreenState};
use crate::settings::Settings;
use crate::sim::Rect;
use crate::tuning::{CharacterKind, Difficulty};

/// Selection-screen card: sprite edge length
const CARD_SPRITE: f32 = 300.0;
const CARD_TOP: f32 = 220.0;
/// Difficulty option box
const OPTION_W: f32 = 600.0;
const OPTION_H: f32 = 100.0;
const OPTION_FIRST_Y: f32 = 280.0;
const OPTION_SPACING: f32 = 140.0;
const BORDER: f32 = 6.0;
const BRICK_BORDER: f32 = 4.0;
const HITBOX_BORDER: f32 = 2.0;

/// Draw one frame
pub fn render(game: &Game, surface: &mut dyn DrawSurface, settings: &Settings) {
    let canvas = &game.tuning().canvas;
    let size = Vec2::new(canvas.width, canvas.height);

    match game.screen() {
        ScreenState::Loading => render_loading(game, surface, size),
        ScreenState::SelectCharacter => render_character_select(game, surface, size),
        ScreenState::SelectDifficulty => render_difficulty_select(game, surface, size),
        ScreenState::Playing => {
            render_playfield(game, surface, settings, size);
            render_score(game, surface);
        }
        ScreenState::GameOver => {
            render_playfield(game, surface, settings, size);
            render_score(game, surface);
            render_game_over(game, surface, size);
        }
    }

    if settings.show_version {
        surface.draw_text(
            VERSION,
            Vec2::new(size.x - 20.0, 30.0),
            16.0,
            TextAlign::Right,
            palette::BLACK,
        );
    }
}

fn centered(surface: &mut dyn DrawSurface, text: &str, size: Vec2, y: f32, px: f32, color: Color) {
    surface.draw_text(text, Vec2::new(size.x / 2.0, y), px, TextAlign::Center, color);
}

fn render_loading(game: &Game, surface: &mut dyn DrawSurface, size: Vec2) {
    surface.fill_rect(Rect::new(0.0, 0.0, size.x, size.y), palette::SKY);
    match game.load_error() {
        None => centered(surface, "LOADING...", size, size.y / 2.0, 32.0, palette::BLACK),
        Some(error) => {
            centered(surface, "FAILED TO LOAD", size, size.y / 2.0, 40.0, palette::BLACK);
            centered(surface, error, size, size.y / 2.0 + 60.0, 16.0, palette::BLACK);
        }
    }
}

fn render_character_select(game: &Game, surface: &mut dyn DrawSurface, size: Vec2) {
    surface.fill_rect(Rect::new(0.0, 0.0, size.x, size.y), palette::SKY);
    centered(surface, "BARKOUR", size, 120.0, 64.0, palette::BLACK);
    centered(surface, "SELECT YOUR DOG", size, 180.0, 24.0, palette::BLACK);

    let selected = game.selection().character;
    for (kind, x) in [
        (CharacterKind::Buddy, size.x / 2.0 - 350.0),
        (CharacterKind::Neet, size.x / 2.0 + 50.0),
    ] {
        draw_character_card(surface, kind, x, kind == selected);
    }

    centered(surface, "ARROW KEYS / CLICK / TAP TO SELECT", size, 700.0, 20.0, palette::BLACK);
    centered(surface, "SPACE / CLICK / TAP TO CONTINUE", size, 750.0, 20.0, palette::BLACK);
}

fn draw_character_card(surface: &mut dyn DrawSurface, kind: CharacterKind, x: f32, selected: bool) {
    let y = CARD_TOP;
    if selected {
        surface.fill_rect(
            Rect::new(x - 20.0, y - 20.0, CARD_SPRITE + 40.0, CARD_SPRITE + 90.0),
            palette::BLOCK_ORANGE,
        );
    }
    let frame = Rect::new(x - 15.0, y - 15.0, CARD_SPRITE + 30.0, CARD_SPRITE + 30.0);
    surface.fill_rect(frame, palette::WHITE);
    surface.stroke_rect(frame, BORDER, palette::BLACK);
    surface.draw_image(
        Sprite::for_character(kind),
        Rect::new(x, y, CARD_SPRITE, CARD_SPRITE),
    );
    surface.draw_text(
        kind.name(),
        Vec2::new(x + CARD_SPRITE / 2.0, y + CARD_SPRITE + 50.0),
        32.0,
        TextAlign::Center,
        palette::BLACK,
    );
}

fn render_difficulty_select(game: &Game, surface: &mut dyn DrawSurface, size: Vec2) {
    surface.fill_rect(Rect::new(0.0, 0.0, size.x, size.y), palette::SKY);
    centered(surface, "SELECT DIFFICULTY", size, 120.0, 48.0, palette::BLACK);

    let selected = game.selection().difficulty;
    for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
        let center_y = OPTION_FIRST_Y + i as f32 * OPTION_SPACING;
        let boxed = Rect::new(
            size.x / 2.0 - OPTION_W / 2.0,
            center_y - OPTION_H / 2.0,
            OPTION_W,
            OPTION_H,
        );
        if *difficulty == selected {
            surface.fill_rect(
                Rect::new(boxed.x - 5.0, boxed.y - 5.0, boxed.w + 10.0, boxed.h + 10.0),
                palette::BLOCK_ORANGE,
            );
        }
        surface.fill_rect(boxed, palette::WHITE);
        surface.stroke_rect(boxed, BORDER, palette::BLACK);
        centered(surface, difficulty.key(), size, center_y + 16.0, 40.0, palette::BLACK);
    }

    centered(surface, "ARROW KEYS / CLICK / TAP TO SELECT", size, 700.0, 20.0, palette::BLACK);
    centered(surface, "SPACE / DOUBLE-CLICK / TAP TO START", size, 750.0, 20.0, palette::BLACK);
}

/// Sky, scenery, obstacles and the runner
fn render_playfield(game: &Game, surface: &mut dyn DrawSurface, settings: &Settings, size: Vec2) {
    let ground = &game.tuning().ground;
    let background = game.background();

    surface.fill_rect(Rect::new(0.0, 0.0, size.x, ground.y), palette::SKY);

    let cloud_size = background.cloud_size();
    for cloud in &background.clouds {
        surface.draw_image(Sprite::Cloud, Rect::from_pos_size(cloud.pos, cloud_size));
    }

    surface.fill_rect(Rect::new(0.0, ground.y, size.x, ground.height), palette::GROUND);
    let brick = background.brick_size();
    let mut x = background.ground_offset.floor();
    while x < size.x + brick {
        let mut y = ground.y;
        while y < size.y {
            draw_brick(surface, x, y, brick);
            y += brick;
        }
        x += brick;
    }

    for obstacle in game.obstacles().obstacles() {
        surface.draw_image(Sprite::Pipe, obstacle.sprite_rect());
    }

    let character = game.character();
    surface.draw_image(Sprite::for_character(character.kind), character.sprite_rect());

    if settings.show_hitboxes {
        surface.stroke_rect(character.bounds(), HITBOX_BORDER, palette::HITBOX);
        for obstacle in game.obstacles().obstacles() {
            surface.stroke_rect(obstacle.bounds(), HITBOX_BORDER, palette::HITBOX);
        }
    }
}

fn draw_brick(surface: &mut dyn DrawSurface, x: f32, y: f32, size: f32) {
    let tile = Rect::new(x, y, size, size);
    surface.fill_rect(tile, palette::GROUND);
    surface.stroke_rect(tile, BRICK_BORDER, palette::BLACK);
    surface.fill_rect(
        Rect::new(x + 4.0, y + 4.0, size - 16.0, size - 16.0),
        palette::BRICK_HIGHLIGHT,
    );
    surface.fill_rect(
        Rect::new(x + size - 12.0, y + size - 12.0, 8.0, 8.0),
        palette::BRICK_DARK,
    );
}

fn render_score(game: &Game, surface: &mut dyn DrawSurface) {
    let round = game.round();
    surface.draw_text(
        &format!("HI {:05}", round.high_score()),
        Vec2::new(40.0, 60.0),
        32.0,
        TextAlign::Left,
        palette::BLACK,
    );
    surface.draw_text(
        &format!("{:05}", round.display_score()),
        Vec2::new(500.0, 60.0),
        32.0,
        TextAlign::Left,
        palette::BLACK,
    );
}

fn render_game_over(game: &Game, surface: &mut dyn DrawSurface, size: Vec2) {
    let round = game.round();
    surface.fill_rect(Rect::new(0.0, 0.0, size.x, size.y), palette::OVERLAY);
    centered(surface, "GAME OVER", size, 250.0, 64.0, palette::WHITE);
    centered(
        surface,
        &format!("SCORE: {}", round.display_score()),
        size,
        350.0,
        32.0,
        palette::WHITE,
    );
    centered(
        surface,
        &format!("BEST: {}", round.high_score()),
        size,
        410.0,
        32.0,
        palette::WHITE,
    );
    centered(surface, "SPACE / CLICK TOP TO RESTART", size, 500.0, 20.0, palette::WHITE);
    centered(
        surface,
        "C / CLICK BOTTOM TO CHANGE CHARACTER",
        size,
        550.0,
        20.0,
        palette::WHITE,
    );
}
