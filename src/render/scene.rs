//! Neon scene drawing: grid, particles, food and snake

use super::surface::{Blend, ColorStop, Paint, Surface};
use crate::config::GameConfig;
use crate::game::food::Food;
use crate::game::particles::ParticleSystem;
use crate::game::snake::Snake;

const FADE: &str = "rgba(0, 0, 0, 0.18)";
const GRID_LINE: &str = "rgba(0, 255, 255, 0.05)";
const HEAD_COLOR: &str = "#00ffff";
const BODY_COLOR: &str = "#ff00ff";
const FOOD_COLOR: &str = "#ff00ff";
const SEGMENT_FADE: &str = "rgba(255,255,255,0.05)";

/// Draw one full frame.
///
/// `shake` is the screen-shake translation for this frame, if any.
pub fn draw_scene(
    surface: &mut dyn Surface,
    config: &GameConfig,
    snake: &Snake,
    food: &mut Food,
    particles: &ParticleSystem,
    shake: Option<(f64, f64)>,
) {
    // Translucent clear leaves glowing trails behind moving shapes
    surface.fill_rect(
        0.0,
        0.0,
        config.canvas_width(),
        config.canvas_height(),
        &Paint::solid(FADE),
    );

    surface.save();
    if let Some((dx, dy)) = shake {
        surface.translate(dx, dy);
    }

    draw_grid(surface, config);
    surface.set_blend(Blend::Additive);
    draw_particles(surface, particles);
    draw_food(surface, food, config.cell_size);
    draw_snake(surface, snake, config.cell_size);
    surface.set_blend(Blend::Normal);

    surface.restore();
}

pub fn draw_grid(surface: &mut dyn Surface, config: &GameConfig) {
    let (width, height) = (config.canvas_width(), config.canvas_height());

    for i in 0..=config.tiles_x {
        let x = i as f64 * config.cell_size;
        surface.line(x, 0.0, x, height, GRID_LINE, 1.0);
    }
    for i in 0..=config.tiles_y {
        let y = i as f64 * config.cell_size;
        surface.line(0.0, y, width, y, GRID_LINE, 1.0);
    }
}

pub fn draw_particles(surface: &mut dyn Surface, particles: &ParticleSystem) {
    for p in particles.iter() {
        let color = p.color.css();
        surface.set_glow(14.0, color);
        surface.set_alpha(p.life.clamp(0.0, 1.0));
        surface.fill_circle(p.x, p.y, p.size, &Paint::solid(color));
    }

    surface.set_alpha(1.0);
    surface.set_glow(0.0, "");
}

/// Draw the food, advancing its pulse phase by one step
pub fn draw_food(surface: &mut dyn Surface, food: &mut Food, cell_size: f64) {
    let (scale, glow) = food.advance_pulse();
    let (cx, cy) = food.position.center_px(cell_size);

    surface.set_glow(glow, FOOD_COLOR);
    let gradient = Paint::Radial {
        x: cx,
        y: cy,
        r0: 0.0,
        r1: cell_size / 2.0,
        stops: vec![
            ColorStop::new(0.0, "rgba(255, 0, 255, 1)"),
            ColorStop::new(0.5, "rgba(255, 0, 255, 0.85)"),
            ColorStop::new(1.0, "rgba(255, 0, 255, 0.18)"),
        ],
    };
    surface.fill_circle(cx, cy, cell_size / 3.0 * scale, &gradient);
    surface.stroke_circle(cx, cy, cell_size / 2.5 * scale, FOOD_COLOR, 2.0);
    surface.set_glow(0.0, "");
}

/// Draw every segment at its smoothed position; the head glows brighter
pub fn draw_snake(surface: &mut dyn Surface, snake: &Snake, cell_size: f64) {
    for (i, segment) in snake.segments().enumerate() {
        let (x, y) = segment.drawn;
        let (color, glow) = if i == 0 {
            (HEAD_COLOR, 28.0)
        } else {
            (BODY_COLOR, 12.0)
        };

        surface.set_glow(glow, color);
        let gradient = Paint::Linear {
            x0: x,
            y0: y,
            x1: x + cell_size,
            y1: y + cell_size,
            stops: vec![ColorStop::new(0.0, color), ColorStop::new(1.0, SEGMENT_FADE)],
        };
        let inner = cell_size - 4.0;
        surface.fill_rect(x + 2.0, y + 2.0, inner, inner, &gradient);
        surface.stroke_rect(x + 2.0, y + 2.0, inner, inner, color, 2.0);
    }

    surface.set_glow(0.0, "");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cell::GridCell;
    use crate::game::direction::Direction;
    use crate::render::commands::{CommandBuffer, DrawCommand};

    fn count<F: Fn(&DrawCommand) -> bool>(commands: &[DrawCommand], f: F) -> usize {
        commands.iter().filter(|c| f(c)).count()
    }

    #[test]
    fn test_scene_structure() {
        let config = GameConfig::default();
        let snake = Snake::from_cells(
            [GridCell::new(3, 3), GridCell::new(2, 3)],
            Direction::East,
            config.cell_size,
        );
        let mut food = Food::at(GridCell::new(10, 10));
        let particles = ParticleSystem::new();
        let mut buffer = CommandBuffer::new();

        draw_scene(&mut buffer, &config, &snake, &mut food, &particles, Some((1.0, -1.0)));
        let commands = buffer.take();

        assert!(matches!(commands[0], DrawCommand::FillRect { .. }));
        assert_eq!(commands[1], DrawCommand::Save);
        assert_eq!(commands[2], DrawCommand::Translate { dx: 1.0, dy: -1.0 });
        assert_eq!(commands.last(), Some(&DrawCommand::Restore));

        let lines = count(&commands, |c| matches!(c, DrawCommand::Line { .. }));
        assert_eq!(lines as i32, config.tiles_x + 1 + config.tiles_y + 1);

        let segments = count(&commands, |c| matches!(c, DrawCommand::StrokeRect { .. }));
        assert_eq!(segments, 2);
        assert!(food.pulse > 0.0);
    }

    #[test]
    fn test_no_translate_without_shake() {
        let config = GameConfig::default();
        let snake = Snake::new(GridCell::new(3, 3), config.cell_size);
        let mut food = Food::at(GridCell::new(10, 10));
        let mut buffer = CommandBuffer::new();

        draw_scene(&mut buffer, &config, &snake, &mut food, &ParticleSystem::new(), None);
        let commands = buffer.take();
        assert_eq!(count(&commands, |c| matches!(c, DrawCommand::Translate { .. })), 0);
    }

    #[test]
    fn test_head_glows_brighter() {
        let snake = Snake::from_cells(
            [GridCell::new(3, 3), GridCell::new(2, 3)],
            Direction::East,
            18.0,
        );
        let mut buffer = CommandBuffer::new();
        draw_snake(&mut buffer, &snake, 18.0);

        let glows: Vec<f64> = buffer
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Glow { blur, .. } => Some(*blur),
                _ => None,
            })
            .collect();
        assert_eq!(glows, vec![28.0, 12.0, 0.0]);
    }
}
