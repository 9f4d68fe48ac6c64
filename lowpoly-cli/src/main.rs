mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{CliArgs, OutputFormat};
use log::{debug, info};
use lowpoly_core::prelude::{GenerateLowPolySettings, LowPolyArt, LowPolyGenerator};
use lowpoly_image::{
    generate_density_image, render_lowpoly_image_with_settings, source_image_from_dynamic,
    RenderSettings,
};
use obj_exporter::{Geometry, ObjSet, Object, Primitive, Shape, TVertex, Vertex};
use std::{fs, path::Path};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    run(&args)
}

fn run(args: &CliArgs) -> Result<()> {
    let settings = load_settings(args)?;
    debug!("{:#?}", settings);
    let output = args.output_path();
    let format = args.format.kind();
    let image = image::open(&args.input)
        .with_context(|| format!("Cannot open input image {}", args.input.display()))?;

    if format == OutputFormat::Density {
        let density = generate_density_image(&image, &settings.density)
            .context("Cannot produce density image")?;
        density
            .save(&output)
            .with_context(|| format!("Cannot save density image {}", output.display()))?;
        info!("Density image saved to {}", output.display());
        return Ok(());
    }

    let source = source_image_from_dynamic(&image)?;
    let art = LowPolyGenerator::new(source, settings)
        .process_wait_tracked(|current, limit, percentage| {
            debug!(
                "Progress: {}% ({} / {})",
                (percentage * 100.0).clamp(0.0, 100.0),
                current,
                limit
            );
        })
        .context("Cannot produce low-poly art")?;
    info!(
        "Generated {} triangles from {} points",
        art.triangles.len(),
        art.mesh.points.len()
    );

    match format {
        OutputFormat::Json => {
            let contents = serde_json::to_string(&art).context("Cannot serialize JSON art")?;
            write_output(&output, contents)?;
        }
        OutputFormat::JsonPretty => {
            let contents =
                serde_json::to_string_pretty(&art).context("Cannot serialize pretty JSON art")?;
            write_output(&output, contents)?;
        }
        OutputFormat::Yaml => {
            let contents = serde_yaml::to_string(&art).context("Cannot serialize YAML art")?;
            write_output(&output, contents)?;
        }
        OutputFormat::Obj => {
            obj_exporter::export_to_file(&make_obj_set(&art), &output)
                .with_context(|| format!("Cannot save mesh file {}", output.display()))?;
        }
        OutputFormat::Png | OutputFormat::Density => {
            let render_settings = if args.wireframe {
                RenderSettings::debug()
            } else {
                RenderSettings::default()
            };
            render_lowpoly_image_with_settings(&art, &render_settings)
                .save(&output)
                .with_context(|| format!("Cannot save output image {}", output.display()))?;
        }
    }
    info!("Output saved to {}", output.display());
    Ok(())
}

fn load_settings(args: &CliArgs) -> Result<GenerateLowPolySettings> {
    let mut settings = match &args.config {
        Some(path) => read_settings(path)?,
        None => GenerateLowPolySettings::default(),
    };
    args.apply_overrides(&mut settings);
    Ok(settings)
}

fn read_settings(path: &Path) -> Result<GenerateLowPolySettings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Cannot read settings file {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
            .with_context(|| format!("Cannot parse YAML settings {}", path.display())),
        _ => serde_json::from_str(&contents)
            .with_context(|| format!("Cannot parse JSON settings {}", path.display())),
    }
}

fn write_output(path: &Path, contents: String) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Cannot save output file {}", path.display()))
}

fn make_obj_set(art: &LowPolyArt) -> ObjSet {
    let width = art.width.saturating_sub(1).max(1) as f64;
    let height = art.height.saturating_sub(1).max(1) as f64;
    let object = Object {
        name: "lowpoly".to_owned(),
        vertices: art
            .mesh
            .points
            .iter()
            .map(|p| Vertex {
                x: p.x as _,
                y: p.y as _,
                z: 0.0,
            })
            .collect(),
        tex_vertices: art
            .mesh
            .points
            .iter()
            .map(|p| TVertex {
                u: p.x as f64 / width,
                v: p.y as f64 / height,
                w: 0.0,
            })
            .collect(),
        normals: vec![Vertex {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        }],
        geometry: vec![Geometry {
            material_name: None,
            shapes: art
                .mesh
                .triangles
                .iter()
                .map(|t| Shape {
                    primitive: Primitive::Triangle(
                        (t.a, Some(t.a), Some(0)),
                        (t.b, Some(t.b), Some(0)),
                        (t.c, Some(t.c), Some(0)),
                    ),
                    groups: vec![],
                    smoothing_groups: vec![],
                })
                .collect(),
        }],
    };
    ObjSet {
        material_library: None,
        objects: vec![object],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;
    use std::path::PathBuf;

    fn workspace(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lowpoly-cli-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let input = image::RgbImage::from_fn(48, 32, |x, y| {
            if (x / 12 + y / 8) % 2 == 0 {
                image::Rgb([220, 40, 40])
            } else {
                image::Rgb([20, 40, 200])
            }
        });
        input.save(dir.join("input.png")).unwrap();
        dir
    }

    fn run_with(dir: &Path, extra: &[&str]) -> Result<()> {
        let input = dir.join("input.png");
        let mut argv = vec!["lowpoly".to_owned(), input.to_string_lossy().into_owned()];
        argv.extend(extra.iter().map(|s| s.to_string()));
        run(&CliArgs::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_png_output() {
        let dir = workspace("png");
        run_with(&dir, &["--wireframe", "--points", "120"]).unwrap();
        let output = image::open(dir.join("input.lowpoly.png")).unwrap();
        assert_eq!(output.dimensions(), (48, 32));
    }

    #[test]
    fn test_json_output_with_yaml_config() {
        let dir = workspace("json");
        let config = dir.join("settings.yaml");
        fs::write(
            &config,
            "sampling:\n  random_seed: 5\n  target_point_count: 80\ncolor_policy: AreaAverage\n",
        )
        .unwrap();
        let output = dir.join("art.json");
        run_with(
            &dir,
            &[
                "--json",
                "--config",
                config.to_str().unwrap(),
                "-o",
                output.to_str().unwrap(),
                "--seed",
                "6",
            ],
        )
        .unwrap();
        let art: LowPolyArt = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!((art.width, art.height), (48, 32));
        assert_eq!(art.triangles.len(), art.mesh.triangles.len());
        assert!(art.mesh.points.len() <= 80);
    }

    #[test]
    fn test_density_and_obj_outputs() {
        let dir = workspace("density");
        run_with(&dir, &["--density"]).unwrap();
        let density = image::open(dir.join("input.density.png")).unwrap();
        assert_eq!(density.dimensions(), (48, 32));
        run_with(&dir, &["--obj"]).unwrap();
        let obj = fs::read_to_string(dir.join("input.lowpoly.obj")).unwrap();
        assert!(obj.lines().any(|l| l.starts_with("v ")));
        assert!(obj.lines().any(|l| l.starts_with("f ")));
    }

    #[test]
    fn test_missing_input_fails() {
        let args = CliArgs::try_parse_from(["lowpoly", "/nonexistent/lowpoly/input.png"]).unwrap();
        assert!(run(&args).is_err());
    }
}
