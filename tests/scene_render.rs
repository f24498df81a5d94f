//! Integration tests drawing the walker demo through the software rasterizer

use strand::config::AppConfig;
use strand::scene::{layer_polylines, LayerKind, WalkerSystem};
use strand_core::{combined_transform, Framebuffer};
use strand_math::{mat4, Mat4, Vec3};

const WIDTH: usize = 160;
const HEIGHT: usize = 120;
const WHITE: [f32; 4] = [1.0; 4];

fn camera(config: &AppConfig) -> Mat4 {
    let projection = mat4::perspective(
        config.camera.fov.to_radians(),
        WIDTH as f32 / HEIGHT as f32,
        config.camera.near,
        config.camera.far,
    );
    let view = mat4::translation(Vec3::new(0.0, 0.0, -config.camera.distance));
    combined_transform(projection, view, mat4::rotation_degrees(15.0, 30.0, 45.0))
}

fn render(config: &AppConfig) -> (Framebuffer, usize) {
    let trajectories = WalkerSystem::new(config.simulation.to_walker_params()).run();
    let matrix = camera(config);

    let mut framebuffer = Framebuffer::new(WIDTH, HEIGHT);
    framebuffer.clear(config.rendering.background_color);

    let mut drawn = 0;
    for (kind, layer) in [(LayerKind::Rings, &config.rings), (LayerKind::Edges, &config.edges)] {
        let params = layer.line_params(WIDTH as f32, HEIGHT as f32, &config.rendering);
        for polyline in layer_polylines(&trajectories, kind, layer) {
            drawn += framebuffer.draw_polyline(&polyline, &matrix, &params).unwrap();
        }
    }
    (framebuffer, drawn)
}

fn painted(framebuffer: &Framebuffer) -> usize {
    (0..HEIGHT)
        .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
        .filter(|&(x, y)| framebuffer.pixel(x, y) != Some(WHITE))
        .count()
}

#[test]
fn test_demo_scene_draws_every_segment() {
    let config = AppConfig::default();
    let (framebuffer, drawn) = render(&config);

    let walkers = config.simulation.count;
    let iterations = config.simulation.iterations;
    // Closed rings plus open trajectories, all within the cull bound
    assert_eq!(drawn, iterations * walkers + walkers * (iterations - 1));
    assert!(painted(&framebuffer) > 0);
}

#[test]
fn test_demo_scene_is_deterministic() {
    let config = AppConfig::default();
    let (a, _) = render(&config);
    let (b, _) = render(&config);
    assert_eq!(a.to_rgba8(), b.to_rgba8());
}

#[test]
fn test_wider_lines_paint_more() {
    let mut config = AppConfig::default();
    let (thin, _) = render(&config);

    config.rings.width *= 2.0;
    config.edges.width *= 2.0;
    let (wide, _) = render(&config);

    assert!(painted(&wide) > painted(&thin));
}

#[test]
fn test_pixel_colors_stay_in_range() {
    let config = AppConfig::default();
    let (framebuffer, _) = render(&config);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let pixel = framebuffer.pixel(x, y).unwrap();
            assert!(pixel.iter().all(|c| c.is_finite() && (0.0..=1.0).contains(c)));
        }
    }
}
