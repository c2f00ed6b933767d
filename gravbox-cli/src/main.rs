use clap::{Parser, Subcommand};
use gravbox_core::scenes::{self, Scene};
use gravbox_core::{body_states, BodyKind, ContactFlags};

mod logging;
mod viewer;

#[derive(Parser)]
#[command(name = "gravbox")]
#[command(about = "gravbox - 2D gravity and collision sandbox", long_about = None)]
struct Cli {
    /// Show per-step debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in scenes
    List,
    /// Run a scene headless and print the final body states
    Run {
        /// Scene name (see `gravbox list`)
        scene: String,
        /// Number of frames; defaults to the scene's own count
        #[arg(long)]
        steps: Option<u32>,
        /// Frame length override
        #[arg(long)]
        dt: Option<f32>,
        /// Split every frame into this many equal substeps
        #[arg(short = 's', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        steps_per_frame: u32,
        /// Turn off swept collision tests, letting fast bodies tunnel
        #[arg(long)]
        no_sweep: bool,
        /// Print body states after every frame
        #[arg(long)]
        trace: bool,
    },
    /// Open a window and play a scene
    View {
        /// Scene name (see `gravbox list`)
        scene: String,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let outcome = match cli.command {
        Commands::List => {
            list_scenes();
            Ok(())
        }
        Commands::Run {
            scene,
            steps,
            dt,
            steps_per_frame,
            no_sweep,
            trace,
        } => run_scene(
            &scene,
            RunOptions {
                frames: steps,
                dt,
                steps_per_frame,
                sweep: !no_sweep,
                trace,
            },
        ),
        Commands::View { scene } => view_scene(&scene),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn find_scene(name: &str) -> Result<&'static Scene, Box<dyn std::error::Error>> {
    scenes::find(name).ok_or_else(|| format!("unknown scene '{}' (try `gravbox list`)", name).into())
}

fn list_scenes() {
    for scene in scenes::scenes() {
        println!(
            "{:<8} dt={:<5} steps={:<4} {}",
            scene.name, scene.dt, scene.steps, scene.description
        );
    }
}

struct RunOptions {
    frames: Option<u32>,
    dt: Option<f32>,
    steps_per_frame: u32,
    sweep: bool,
    trace: bool,
}

fn run_scene(name: &str, options: RunOptions) -> Result<(), Box<dyn std::error::Error>> {
    let scene = find_scene(name)?;
    let mut world = scene.build()?;
    if !options.sweep {
        let config = world.config().clone().with_swept_collisions(false);
        world.set_config(config)?;
    }
    let dt = options.dt.unwrap_or(scene.dt);
    let frames = options.frames.unwrap_or(scene.steps);
    let substep = dt / options.steps_per_frame as f32;

    for frame in 1..=frames {
        for _ in 0..options.steps_per_frame {
            let report = world.step(substep)?;
            for diagnostic in &report.diagnostics {
                log::warn!("step {}: {}", report.step, diagnostic);
            }
        }
        if options.trace {
            println!("-- frame {}", frame);
            print_states(&world);
        }
    }

    if !options.trace {
        println!(
            "after {} frames of {} ({} substeps each):",
            frames, dt, options.steps_per_frame
        );
        print_states(&world);
    }
    Ok(())
}

fn print_states(world: &gravbox_core::World) {
    for state in body_states(world) {
        let kind = match state.kind {
            BodyKind::Dynamic => "dynamic",
            BodyKind::Static => "static",
            BodyKind::Kinematic => "kinematic",
        };
        println!(
            "{:<8} {:<9} pos=({:.3}, {:.3}) vel=({:.3}, {:.3}) {}",
            state.handle.to_string(),
            kind,
            state.position.x,
            state.position.y,
            state.velocity.x,
            state.velocity.y,
            describe_flags(&state.contacts)
        );
    }
}

fn describe_flags(flags: &ContactFlags) -> String {
    let names: Vec<&str> = [
        (flags.grounded, "grounded"),
        (flags.ceiling, "ceiling"),
        (flags.left_wall, "left-wall"),
        (flags.right_wall, "right-wall"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
    .collect();

    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(",")
    }
}

fn view_scene(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let scene = find_scene(name)?;
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        &format!("gravbox - {}", scene.name),
        options,
        Box::new(move |cc| Ok(Box::new(viewer::SceneViewer::new(scene, cc)))),
    )?;
    Ok(())
}
