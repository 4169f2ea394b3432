use fakegl::state::{EnableFlag, MatrixMode, PrimitiveType, TexEnvMode};
use fakegl::{Image, Pipeline, Rgba8};

fn ortho_pipeline(size: usize) -> Pipeline {
    let mut p = Pipeline::new(size, size);
    p.matrix_mode(MatrixMode::Projection);
    p.ortho(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
    p.matrix_mode(MatrixMode::ModelView);
    p
}

// S5: a 1x1 white texture under REPLACE reproduces the texel; under
// MODULATE it's multiplied by the interpolated vertex color.
#[test]
fn test_replace_vs_modulate() {
    let white_texel = Image::filled(1, 1, Rgba8::white());

    let mut replace = ortho_pipeline(4);
    replace.enable(EnableFlag::Texture2D);
    replace.tex_image_2d(white_texel.clone());
    replace.tex_env_mode(TexEnvMode::Replace);
    replace.color3f(0.5, 0.5, 0.5);
    replace.begin(PrimitiveType::Triangles);
    replace.vertex3f(-1.0, -1.0, 0.0);
    replace.vertex3f(1.0, -1.0, 0.0);
    replace.vertex3f(0.0, 1.0, 0.0);
    replace.end();
    assert_eq!(replace.framebuffer().get_pixel(2, 2), Rgba8::white());

    let mut modulate = ortho_pipeline(4);
    modulate.enable(EnableFlag::Texture2D);
    modulate.tex_image_2d(white_texel);
    modulate.tex_env_mode(TexEnvMode::Modulate);
    modulate.color3f(0.5, 0.5, 0.5);
    modulate.begin(PrimitiveType::Triangles);
    modulate.vertex3f(-1.0, -1.0, 0.0);
    modulate.vertex3f(1.0, -1.0, 0.0);
    modulate.vertex3f(0.0, 1.0, 0.0);
    modulate.end();
    let pixel = modulate.framebuffer().get_pixel(2, 2);
    assert!(pixel.r > 0 && pixel.r < 255, "expected a mid-gray pixel, got {pixel:?}");
}

// S6: Phong shading varies color across a triangle's interior when the
// light is not perpendicular to every fragment's position; Gouraud
// interpolates linearly from vertex colors computed once.
#[test]
fn test_phong_varies_more_than_gouraud_across_a_triangle() {
    fn lit_triangle(phong: bool) -> Pipeline {
        let mut p = ortho_pipeline(20);
        p.enable(EnableFlag::Lighting);
        if phong {
            p.enable(EnableFlag::PhongShading);
        }
        p.light(
            fakegl::LightParam::POSITION,
            fakegl::Vec4::new(2.0, 0.0, 3.0, 1.0),
        );
        p.light(fakegl::LightParam::DIFFUSE, fakegl::Vec4::new(1.0, 1.0, 1.0, 1.0));
        p.material_fv(fakegl::MaterialParam::DIFFUSE, fakegl::Vec4::new(1.0, 1.0, 1.0, 1.0));

        p.color3f(1.0, 1.0, 1.0);
        p.normal3f(-1.0, 0.0, 1.0);
        p.begin(PrimitiveType::Triangles);
        p.vertex3f(-1.0, -1.0, 0.0);
        p.normal3f(0.0, 0.0, 1.0);
        p.vertex3f(1.0, -1.0, 0.0);
        p.normal3f(1.0, 0.0, 1.0);
        p.vertex3f(0.0, 1.0, 0.0);
        p.end();
        p
    }

    let phong = lit_triangle(true);
    let gouraud = lit_triangle(false);

    let variance = |pipeline: &Pipeline| -> i32 {
        let mut min = 255i32;
        let mut max = 0i32;
        for row in 0..20 {
            for col in 0..20 {
                let pixel = pipeline.framebuffer().get_pixel(col, row);
                if pixel.a > 0 {
                    min = min.min(pixel.r as i32);
                    max = max.max(pixel.r as i32);
                }
            }
        }
        max - min
    };

    assert!(variance(&phong) >= variance(&gouraud));
}

// Invariant 9: Bresenham's algorithm passes through both endpoints.
#[test]
fn test_bresenham_hits_both_endpoints() {
    let mut p = ortho_pipeline(10);
    p.color3f(1.0, 1.0, 1.0);
    p.begin(PrimitiveType::Lines);
    p.vertex3f(-1.0, -1.0, 0.0);
    p.vertex3f(1.0, 1.0, 0.0);
    p.end();
    assert_eq!(p.framebuffer().get_pixel(0, 9).a, 255);
    assert_eq!(p.framebuffer().get_pixel(9, 0).a, 255);
}

// Invariant 4: depth monotonicity at a single pixel.
#[test]
fn test_depth_monotonicity_same_pixel() {
    let mut p = ortho_pipeline(4);
    p.enable(EnableFlag::DepthTest);
    p.color3f(1.0, 0.0, 0.0);
    p.begin(PrimitiveType::Points);
    p.vertex3f(0.0, 0.0, -1.0);
    p.end();
    assert_eq!(p.framebuffer().get_pixel(2, 2), Rgba8::new(255, 0, 0, 255));

    p.color3f(0.0, 1.0, 0.0);
    p.begin(PrimitiveType::Points);
    p.vertex3f(0.0, 0.0, 1.0);
    p.end();
    assert_eq!(p.framebuffer().get_pixel(2, 2), Rgba8::new(255, 0, 0, 255));
}
