use std::path::{Path, PathBuf};

use clap::{Args, Parser, ValueEnum, ValueHint};
use lowpoly_core::{
    prelude::{ColorPolicy, GenerateLowPolySettings, GradientSource, PointsSeparation},
    Scalar,
};

#[derive(Clone, Debug, Parser)]
#[command(name = "lowpoly", version, author, about)]
#[command(help_template = "\
{name} {version}
{about}
{author}

{usage-heading}
{tab}{usage}

{all-args}
")]
pub struct CliArgs {
    /// Input image path
    #[arg(value_name = "INPUT", value_hint(ValueHint::FilePath))]
    pub input: PathBuf,

    /// Output file path (defaults to input path with format specific suffix)
    #[arg(short, long, value_name = "PATH", value_hint(ValueHint::FilePath))]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub format: Format,

    /// Settings file (JSON or YAML); flags below override its values
    #[arg(long, value_name = "PATH", value_hint(ValueHint::FilePath))]
    pub config: Option<PathBuf>,

    /// Desired number of points, border points included
    #[arg(long, value_name = "INTEGER")]
    pub points: Option<usize>,

    /// Points separation
    ///
    /// Accepts either a single number, or a range in the format of `MIN..MAX`
    ///
    /// - Single number: constant separation
    /// - Range: `MIN` in the densest regions, `MAX` in the flat ones
    #[arg(long, value_name = "NUMBER_OR_RANGE")]
    pub points_separation: Option<PointsSeparation>,

    /// Multiplier of every points separation value
    #[arg(long, value_name = "NUMBER")]
    pub min_distance_scale: Option<Scalar>,

    /// Minimal density of flat regions
    #[arg(long, value_name = "NUMBER")]
    pub density_floor: Option<Scalar>,

    /// Share of local variance in density (the rest is gradient magnitude)
    #[arg(long, value_name = "NUMBER")]
    pub variance_weight: Option<Scalar>,

    /// Triangle color sampling policy
    #[arg(long, value_name = "POLICY")]
    pub color_policy: Option<ColorPolicySelection>,

    /// Channels used for gradient computation
    #[arg(long, value_name = "CHANNELS")]
    pub gradient_source: Option<GradientSourceSelection>,

    /// Random seed
    #[arg(long, value_name = "INTEGER")]
    pub seed: Option<u64>,

    /// Density field cell size in pixels
    #[arg(long, value_name = "INTEGER")]
    pub scale: Option<usize>,

    /// Draw triangle edges and vertices over rendered image
    #[arg(long)]
    pub wireframe: bool,

    /// Display settings used and progress
    #[arg(long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Apply flag overrides on top of given settings.
    pub fn apply_overrides(&self, settings: &mut GenerateLowPolySettings) {
        if let Some(points) = self.points {
            settings.sampling.target_point_count = Some(points);
        }
        if let Some(separation) = self.points_separation {
            settings.sampling.points_separation = separation;
        }
        if let Some(scale) = self.min_distance_scale {
            settings.sampling.min_distance_scale = scale;
        }
        if let Some(seed) = self.seed {
            settings.sampling.random_seed = seed;
        }
        if let Some(floor) = self.density_floor {
            settings.density.density_floor = floor;
        }
        if let Some(weight) = self.variance_weight {
            settings.density.variance_weight = weight;
        }
        if let Some(source) = self.gradient_source {
            settings.density.gradient_source = source.into();
        }
        if let Some(scale) = self.scale {
            settings.density.scale = scale;
        }
        if let Some(policy) = self.color_policy {
            settings.color_policy = policy.into();
        }
    }

    /// Output path, either given or derived from input path.
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => default_output_path(&self.input, self.format.kind()),
        }
    }
}

fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());
    let file_name = match format {
        OutputFormat::Png => format!("{}.lowpoly.png", stem),
        OutputFormat::Json | OutputFormat::JsonPretty => format!("{}.lowpoly.json", stem),
        OutputFormat::Yaml => format!("{}.lowpoly.yaml", stem),
        OutputFormat::Obj => format!("{}.lowpoly.obj", stem),
        OutputFormat::Density => format!("{}.density.png", stem),
    };
    input.with_file_name(file_name)
}

#[derive(Clone, Copy, Debug, Default, strum::Display, ValueEnum)]
#[strum(serialize_all = "kebab-case")]
pub enum ColorPolicySelection {
    #[default]
    Centroid,
    CentroidBilinear,
    AreaAverage,
    AreaMedian,
}

impl From<ColorPolicySelection> for ColorPolicy {
    fn from(value: ColorPolicySelection) -> Self {
        use ColorPolicy as T; // target
        use ColorPolicySelection as S; // source
        match value {
            S::Centroid => T::Centroid,
            S::CentroidBilinear => T::CentroidBilinear,
            S::AreaAverage => T::AreaAverage,
            S::AreaMedian => T::AreaMedian,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, strum::Display, ValueEnum)]
#[strum(serialize_all = "kebab-case")]
pub enum GradientSourceSelection {
    #[default]
    Luma,
    Rgb,
}

impl From<GradientSourceSelection> for GradientSource {
    fn from(value: GradientSourceSelection) -> Self {
        match value {
            GradientSourceSelection::Luma => GradientSource::Luma,
            GradientSourceSelection::Rgb => GradientSource::Rgb,
        }
    }
}

/// Kind of produced output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Json,
    JsonPretty,
    Yaml,
    Obj,
    Density,
}

#[derive(Clone, Debug, Args)]
#[group(multiple = false)]
pub struct Format {
    /// Produce rendered PNG image (default)
    #[arg(long)]
    pub png: bool,

    /// Produce JSON art
    #[arg(long)]
    pub json: bool,

    /// Produce pretty JSON art
    #[arg(long)]
    pub json_pretty: bool,

    /// Produce YAML art
    #[arg(long)]
    pub yaml: bool,

    /// Produce OBJ mesh
    #[arg(long)]
    pub obj: bool,

    /// Produce density field image
    #[arg(long)]
    pub density: bool,
}

impl Format {
    pub fn kind(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.json_pretty {
            OutputFormat::JsonPretty
        } else if self.yaml {
            OutputFormat::Yaml
        } else if self.obj {
            OutputFormat::Obj
        } else if self.density {
            OutputFormat::Density
        } else {
            OutputFormat::Png
        }
    }
}
