//! Texture and motion showcase: checkered ground, marble and image-mapped
//! spheres, fuzzy metal, glass, and one moving sphere under a sky-colored
//! background.

use std::sync::Arc;

use anyhow::Result;
use ember_renderer::{
    BvhNode, Camera, CheckerTexture, Color, Dielectric, DiffuseLight, HittableList, ImageTexture,
    Lambertian, Metal, NoiseTexture, Quad, Sphere, Vec3,
};

fn main() -> Result<()> {
    env_logger::init();

    let mut world = HittableList::new();

    // Checkered ground quad.
    let checker = Arc::new(CheckerTexture::from_colors(
        0.6,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    world.add(Arc::new(Quad::new(
        Vec3::new(-20.0, 0.0, 20.0),
        Vec3::new(40.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -40.0),
        Arc::new(Lambertian::new(checker)),
    )));

    // Marble sphere.
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Arc::new(NoiseTexture::new(4.0)))),
    )));

    // Image-mapped sphere; falls back to the diagnostic color when the file
    // is absent.
    world.add(Arc::new(Sphere::new(
        Vec3::new(-1.5, 1.0, 2.0),
        1.0,
        Arc::new(Lambertian::new(Arc::new(ImageTexture::load("earthmap.jpg")))),
    )));

    // Glass, metal, and a moving diffuse sphere.
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.1)),
    )));
    world.add(Arc::new(Sphere::new_moving(
        Vec3::new(2.0, 0.4, 2.5),
        Vec3::new(2.0, 0.9, 2.5),
        0.4,
        Arc::new(Lambertian::from_color(Color::new(0.7, 0.3, 0.2))),
    )));

    // Overhead light panel.
    let light_quad = Arc::new(Quad::new(
        Vec3::new(-2.0, 6.0, -2.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        Arc::new(DiffuseLight::from_color(Color::new(7.0, 7.0, 7.0))),
    ));
    world.add(light_quad.clone());

    let mut lights = HittableList::new();
    lights.add(light_quad);

    let world = BvhNode::from_list(world);

    let camera = Camera::new()
        .with_image(16.0 / 9.0, 800)
        .with_quality(100, 50)
        .with_view(Vec3::new(10.0, 3.0, 8.0), Vec3::new(0.0, 1.0, 0.0), Vec3::Y)
        .with_lens(28.0, 0.4, 12.0)
        .with_background(Color::new(0.53, 0.81, 0.92))
        .with_seed(42);

    camera.render_with_lights(&world, &lights, "showcase.ppm")?;
    Ok(())
}
