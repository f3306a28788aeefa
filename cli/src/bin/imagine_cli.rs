use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use catalog::{
    AnnotationSource, IndexBuilder, JsonDirectorySource, ObjectIndex, SelectionStrategy,
    distinct_object_counts, select_candidate,
};
use clap::{Parser, Subcommand};
use cli::SceneConfig;
use color_eyre::eyre::{Result, eyre};
use cutout::{Cutout, CutoutBuilder, PlacementAnchor, RasterStrategy};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory of annotation records and write the object index
    BuildIndex {
        /// Directory holding the annotation records
        #[arg(short, long)]
        data_dir: PathBuf,
        /// Output path for the index (defaults to <data_dir>/index.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Smallest polygon area kept by the scan
        #[arg(long, default_value_t = catalog::DEFAULT_MIN_AREA)]
        min_area: f64,
        /// Keep negligibly small objects too
        #[arg(long)]
        no_filter: bool,
    },
    /// Look up an object name in a persisted index
    Lookup {
        /// Path to the index file
        #[arg(short, long)]
        index: PathBuf,
        /// Object name, matched exactly (case-sensitive)
        name: String,
        /// Pick a single candidate instead of listing every file
        #[arg(long)]
        select: Option<SelectionStrategy>,
        /// Annotation directory, needed to rank files by clutter
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Extract one labeled object from its source image into a PNG cutout
    Extract {
        /// Directory holding annotation records and source images
        #[arg(short, long)]
        data_dir: PathBuf,
        /// Index file (defaults to <data_dir>/index.json, built on the fly
        /// when absent)
        #[arg(short, long)]
        index: Option<PathBuf>,
        /// Object name to extract
        name: String,
        /// Where to write the cutout PNG
        #[arg(short, long)]
        output: PathBuf,
        /// Rasterization strategy
        #[arg(long, default_value = "polygon_fill")]
        strategy: RasterStrategy,
        #[arg(long, default_value_t = 0.5)]
        anchor_x: f32,
        #[arg(long, default_value_t = 0.5)]
        anchor_y: f32,
        /// Largest cutout edge before integer downscaling
        #[arg(long, default_value_t = cutout::DEFAULT_SIZE_THRESHOLD)]
        size_threshold: u32,
    },
    /// Resolve a scene file into cutout PNGs plus a placement manifest
    Scene {
        /// Scene description (.toml or .json)
        #[arg(short, long)]
        config: PathBuf,
        /// Directory holding annotation records and source images
        #[arg(short, long)]
        data_dir: PathBuf,
        /// Directory receiving the cutouts and manifest.json
        #[arg(short, long)]
        output_dir: PathBuf,
        /// Rasterization strategy
        #[arg(long, default_value = "polygon_fill")]
        strategy: RasterStrategy,
    },
}

#[derive(Serialize)]
struct ManifestEntry {
    name: String,
    file: String,
    anchor: [f32; 2],
    width: u32,
    height: u32,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::BuildIndex {
            data_dir,
            output,
            min_area,
            no_filter,
        } => build_index(&data_dir, output.as_deref(), min_area, no_filter),
        Commands::Lookup {
            index,
            name,
            select,
            data_dir,
        } => lookup(&index, &name, select, data_dir.as_deref()),
        Commands::Extract {
            data_dir,
            index,
            name,
            output,
            strategy,
            anchor_x,
            anchor_y,
            size_threshold,
        } => extract(
            &data_dir,
            index.as_deref(),
            &name,
            &output,
            strategy,
            PlacementAnchor::new(anchor_x, anchor_y),
            size_threshold,
        ),
        Commands::Scene {
            config,
            data_dir,
            output_dir,
            strategy,
        } => scene(&config, &data_dir, &output_dir, strategy),
    }
}

fn build_index(
    data_dir: &Path,
    output: Option<&Path>,
    min_area: f64,
    no_filter: bool,
) -> Result<()> {
    let source = JsonDirectorySource::new(data_dir);
    let builder = if no_filter {
        IndexBuilder::new().without_area_filter()
    } else {
        IndexBuilder::new().with_min_area(min_area)
    };

    let index = builder.build(&source)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| data_dir.join("index.json"));
    index.save(&output)?;

    info!(names = index.len(), path = %output.display(), "index written");
    Ok(())
}

fn lookup(
    index_path: &Path,
    name: &str,
    select: Option<SelectionStrategy>,
    data_dir: Option<&Path>,
) -> Result<()> {
    let index = ObjectIndex::load(index_path)?;
    let files = index.lookup(name);
    if files.is_empty() {
        warn!(%name, "no object of that name in the index");
        return Ok(());
    }

    match select {
        None => {
            for file in files {
                println!("{file}");
            }
        }
        Some(strategy) => {
            let counts = match (strategy, data_dir) {
                (SelectionStrategy::Random, _) => HashMap::new(),
                (SelectionStrategy::FewestCooccurringObjects, Some(dir)) => {
                    distinct_object_counts(&JsonDirectorySource::new(dir).records()?)
                }
                (SelectionStrategy::FewestCooccurringObjects, None) => {
                    return Err(eyre!(
                        "--data-dir is required to rank candidates by clutter"
                    ));
                }
            };
            let picked = select_candidate(files, strategy, &counts, &mut rand::thread_rng())
                .ok_or_else(|| eyre!("no candidate selected"))?;
            println!("{picked}");
        }
    }
    Ok(())
}

fn extract(
    data_dir: &Path,
    index_path: Option<&Path>,
    name: &str,
    output: &Path,
    strategy: RasterStrategy,
    anchor: PlacementAnchor,
    size_threshold: u32,
) -> Result<()> {
    let source = JsonDirectorySource::new(data_dir);
    let index = load_or_build_index(data_dir, index_path)?;

    let cutout = extract_one(
        &source,
        &index,
        name,
        strategy,
        anchor,
        size_threshold,
        &mut rand::thread_rng(),
    )?
    .ok_or_else(|| eyre!("no object named '{name}' in the dataset"))?;

    cutout.image().save(output)?;
    info!(
        %name,
        path = %output.display(),
        width = cutout.width(),
        height = cutout.height(),
        "cutout written"
    );
    Ok(())
}

fn scene(config: &Path, data_dir: &Path, output_dir: &Path, strategy: RasterStrategy) -> Result<()> {
    let scene = SceneConfig::from_file(config)?;
    let source = JsonDirectorySource::new(data_dir);
    let index = load_or_build_index(data_dir, None)?;
    fs::create_dir_all(output_dir)?;

    let mut rng = rand::thread_rng();
    let mut manifest = Vec::new();

    for (name, anchor) in scene.resolved_placements() {
        let Some(cutout) = extract_one(
            &source,
            &index,
            &name,
            strategy,
            anchor,
            cutout::DEFAULT_SIZE_THRESHOLD,
            &mut rng,
        )?
        else {
            continue;
        };

        let file = format!("{}.png", sanitize(&name));
        cutout.image().save(output_dir.join(&file))?;
        let anchor = cutout.anchor();
        manifest.push(ManifestEntry {
            name,
            file,
            anchor: [anchor.x, anchor.y],
            width: cutout.width(),
            height: cutout.height(),
        });
    }

    if manifest.is_empty() {
        return Err(eyre!("none of the scene's objects were found in the dataset"));
    }

    fs::write(
        output_dir.join("manifest.json"),
        serde_json::to_string_pretty(&manifest)?,
    )?;
    info!(objects = manifest.len(), path = %output_dir.display(), "scene resolved");
    Ok(())
}

/// Loads the index next to the data when one exists, otherwise builds a
/// fresh one in memory without persisting it.
fn load_or_build_index(data_dir: &Path, index_path: Option<&Path>) -> Result<ObjectIndex> {
    if let Some(path) = index_path {
        return Ok(ObjectIndex::load(path)?);
    }
    let default_path = data_dir.join("index.json");
    if default_path.exists() {
        return Ok(ObjectIndex::load(&default_path)?);
    }
    info!(dir = %data_dir.display(), "no persisted index, scanning the dataset");
    Ok(IndexBuilder::new().build(&JsonDirectorySource::new(data_dir))?)
}

/// Picks an annotation file and one of its matching outlines at random and
/// builds the cutout. `None` when the index has no entry for the name.
fn extract_one(
    source: &JsonDirectorySource,
    index: &ObjectIndex,
    name: &str,
    strategy: RasterStrategy,
    anchor: PlacementAnchor,
    size_threshold: u32,
    rng: &mut impl Rng,
) -> Result<Option<Cutout>> {
    let files = index.lookup(name);
    let Some(file) = files.choose(rng) else {
        warn!(%name, "no object of that name in the index");
        return Ok(None);
    };

    let record = source.load_record(file)?;
    let candidates = record.objects_named(name);
    let Some(object) = candidates.choose(rng) else {
        warn!(%name, %file, "indexed file no longer contains the object");
        return Ok(None);
    };

    let image = image::open(data_path(source, &record.image_file()))?.to_rgba8();
    let raster = strategy.rasterizer().rasterize(&object.polygon, &image)?;
    let cutout = CutoutBuilder::new()
        .with_size_threshold(size_threshold)
        .build(&image, &raster, anchor)?;
    Ok(Some(cutout))
}

fn data_path(source: &JsonDirectorySource, file: &str) -> PathBuf {
    source.directory().join(file)
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
