//! softpipe viewer and exporter
//!
//! Usage:
//!   softpipe [scene.ron] [--png out.png] [--width W] [--height H]
//!
//! With `--png` the scene is rendered once and written to disk. Otherwise a
//! window shows the frame: R reloads the scene file, S saves a screenshot,
//! Escape quits.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use macroquad::prelude::{
    clear_background, draw_texture_ex, is_key_pressed, next_frame, screen_height, screen_width,
    vec2, DrawTextureParams, FilterMode, KeyCode, Texture2D, BLACK, WHITE,
};
use macroquad::window::Conf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use softpipe::rasterizer::{save_framebuffer, ImageSink, RenderPipeline, Scalar, Stages};
use softpipe::scene::{load_scene, load_scene_from_str, Scene};
use softpipe::VERSION;

const DEFAULT_SCENE: &str = include_str!("../scenes/cube.ron");
const SCREENSHOT: &str = "softpipe.png";

#[derive(Debug, Default)]
struct Options {
    scene: Option<PathBuf>,
    png: Option<PathBuf>,
    width: Option<usize>,
    height: Option<usize>,
}

fn usage() -> &'static str {
    "usage: softpipe [scene.ron] [--png out.png] [--width W] [--height H]"
}

fn parse_args() -> anyhow::Result<Options> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut opts = Options::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--png" => {
                i += 1;
                let path = args.get(i).context("--png needs a path")?;
                opts.png = Some(PathBuf::from(path));
            }
            "--width" => {
                i += 1;
                let w = args.get(i).context("--width needs a value")?;
                opts.width = Some(w.parse().with_context(|| format!("bad width {w:?}"))?);
            }
            "--height" => {
                i += 1;
                let h = args.get(i).context("--height needs a value")?;
                opts.height = Some(h.parse().with_context(|| format!("bad height {h:?}"))?);
            }
            "-h" | "--help" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n{}", usage()),
            path => {
                if opts.scene.is_some() {
                    bail!("more than one scene given\n{}", usage());
                }
                opts.scene = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    if opts.width == Some(0) || opts.height == Some(0) {
        bail!("width and height must be positive");
    }
    Ok(opts)
}

/// Load the requested scene (or the bundled cube) and apply size overrides
fn load(opts: &Options) -> anyhow::Result<Scene> {
    let mut scene = match &opts.scene {
        Some(path) => load_scene(path).with_context(|| format!("loading {}", path.display()))?,
        None => load_scene_from_str(DEFAULT_SCENE).context("loading bundled scene")?,
    };

    if let Some(w) = opts.width {
        scene.settings.width = w;
        if let Some(view) = scene.view.as_mut() {
            view.viewport_width = w as Scalar;
        }
    }
    if let Some(h) = opts.height {
        scene.settings.height = h;
        if let Some(view) = scene.view.as_mut() {
            view.viewport_height = h as Scalar;
        }
    }
    Ok(scene)
}

fn export(scene: &Scene, path: PathBuf) -> anyhow::Result<()> {
    let mut pipeline = RenderPipeline::new(scene.settings.clone());
    scene.render(&mut pipeline, &Stages::standard()).context("rendering scene")?;

    let mut sink = ImageSink::new(path);
    let stats = pipeline.flush_to(&mut sink)?;
    info!(
        path = %sink.path().display(),
        frame = ?sink.last_frame(),
        written = stats.written,
        rejected = stats.depth_rejected,
        "frame exported"
    );
    Ok(())
}

fn window_conf(scene: &Scene) -> Conf {
    Conf {
        window_title: format!("softpipe v{}", VERSION),
        window_width: scene.settings.width as i32,
        window_height: scene.settings.height as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Framebuffer size as texture dimensions
fn texture_size(width: usize, height: usize) -> anyhow::Result<(u16, u16)> {
    let w = u16::try_from(width).with_context(|| format!("width {width} too large for a texture"))?;
    let h =
        u16::try_from(height).with_context(|| format!("height {height} too large for a texture"))?;
    Ok((w, h))
}

/// Render into a fresh pipeline and upload the result as a texture
fn render_texture(scene: &Scene, stages: &Stages) -> anyhow::Result<(RenderPipeline, Texture2D)> {
    let (width, height) = texture_size(scene.settings.width, scene.settings.height)?;
    let mut pipeline = RenderPipeline::new(scene.settings.clone());
    match scene.render(&mut pipeline, stages) {
        Ok(()) => {
            let stats = pipeline.flush();
            info!(
                frame = stats.frame,
                written = stats.written,
                rejected = stats.depth_rejected,
                "frame rendered"
            );
        }
        Err(e) => error!(%e, "render failed"),
    }

    let texture = Texture2D::from_rgba8(width, height, &pipeline.framebuffer().to_rgba8());
    texture.set_filter(FilterMode::Nearest);
    Ok((pipeline, texture))
}

async fn viewer(path: Option<PathBuf>, mut scene: Scene) {
    let stages = Stages::standard();
    let (mut pipeline, mut texture) = match render_texture(&scene, &stages) {
        Ok(rendered) => rendered,
        Err(e) => {
            error!("{e:#}");
            return;
        }
    };

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        if is_key_pressed(KeyCode::R) {
            if let Some(path) = &path {
                match load_scene(path) {
                    Ok(reloaded) => match render_texture(&reloaded, &stages) {
                        Ok(rendered) => {
                            scene = reloaded;
                            (pipeline, texture) = rendered;
                            info!(items = scene.items.len(), "scene reloaded");
                        }
                        Err(e) => error!("reload failed: {e:#}"),
                    },
                    Err(e) => error!(%e, "reload failed"),
                }
            }
        }

        if is_key_pressed(KeyCode::S) {
            match save_framebuffer(pipeline.framebuffer(), Path::new(SCREENSHOT)) {
                Ok(()) => info!(path = SCREENSHOT, "screenshot saved"),
                Err(e) => error!(%e, "screenshot failed"),
            }
        }

        clear_background(BLACK);

        // Keep the aspect ratio, centered
        let scale = (screen_width() / texture.width()).min(screen_height() / texture.height());
        let (w, h) = (texture.width() * scale, texture.height() * scale);
        draw_texture_ex(
            &texture,
            (screen_width() - w) / 2.0,
            (screen_height() - h) / 2.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(w, h)),
                ..Default::default()
            },
        );

        next_frame().await;
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let opts = parse_args()?;
    let scene = load(&opts)?;
    info!(version = VERSION, items = scene.items.len(), "softpipe starting");

    if let Some(png) = opts.png {
        return export(&scene, png);
    }
    texture_size(scene.settings.width, scene.settings.height)?;

    macroquad::Window::from_config(window_conf(&scene), viewer(opts.scene, scene));
    Ok(())
}
