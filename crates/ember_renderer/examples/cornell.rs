//! Cornell box driver: quads, instanced boxes, glass, smoke, and an area
//! light sampled through the light list.

use std::sync::Arc;

use anyhow::Result;
use ember_renderer::{
    make_box, BvhNode, Camera, Color, ConstantMedium, Dielectric, DiffuseLight, Hittable,
    HittableList, Lambertian, Quad, RotateY, Sphere, Translate, Vec3,
};

fn main() -> Result<()> {
    env_logger::init();

    let red = Arc::new(Lambertian::from_color(Color::new(0.65, 0.05, 0.05)));
    let white = Arc::new(Lambertian::from_color(Color::new(0.73, 0.73, 0.73)));
    let green = Arc::new(Lambertian::from_color(Color::new(0.12, 0.45, 0.15)));
    let light = Arc::new(DiffuseLight::from_color(Color::new(15.0, 15.0, 15.0)));

    let mut world = HittableList::new();

    // Walls.
    world.add(Arc::new(Quad::new(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(555.0, 555.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white.clone(),
    )));

    // Ceiling light, duplicated into the sampling list below.
    let light_quad = Arc::new(Quad::new(
        Vec3::new(213.0, 554.0, 227.0),
        Vec3::new(130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 105.0),
        light,
    ));
    world.add(light_quad.clone());

    // Tall box, rotated and pushed toward the back, wrapped in light smoke.
    let tall_box: Arc<dyn Hittable> = Arc::new(Translate::new(
        Arc::new(RotateY::new(
            Arc::new(make_box(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone())),
            15.0,
        )),
        Vec3::new(265.0, 0.0, 295.0),
    ));
    world.add(Arc::new(ConstantMedium::from_color(
        tall_box,
        0.01,
        Color::ZERO,
    )));

    // Short box with a glass sphere resting on it.
    world.add(Arc::new(Translate::new(
        Arc::new(RotateY::new(
            Arc::new(make_box(Vec3::ZERO, Vec3::new(165.0, 165.0, 165.0), white)),
            -18.0,
        )),
        Vec3::new(130.0, 0.0, 65.0),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(190.0, 255.0, 145.0),
        90.0,
        Arc::new(Dielectric::new(1.5)),
    )));

    let mut lights = HittableList::new();
    lights.add(light_quad);

    let world = BvhNode::from_list(world);

    let camera = Camera::new()
        .with_image(1.0, 600)
        .with_quality(200, 50)
        .with_view(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_background(Color::ZERO)
        .with_seed(42);

    camera.render_with_lights(&world, &lights, "cornell.ppm")?;
    Ok(())
}
