//! Default command: finish the package in the working directory.

use anyhow::{Context, Result};

use crate::cli::Cli;
use shimpack::core::namespace::{ManifestNamespace, NamespaceSource, PythonIntrospector};
use shimpack::ops::{finish_package, FinishOptions};
use shimpack::util::config::{
    global_config_path, load_config, project_config_path, Config, PackageConfig, ShimConfig,
};
use shimpack::util::diagnostic::{emit, Diagnostic};

pub fn execute(cli: Cli, color: bool) -> Result<()> {
    // Paths given on the command line are relative to where shimpack runs,
    // paths in config files are relative to the working directory.
    let invocation_dir =
        std::env::current_dir().context("failed to determine current directory")?;
    let working_dir = match cli.working_dir {
        Some(dir) => invocation_dir.join(dir),
        None => invocation_dir.clone(),
    };
    let manifest = cli.manifest.map(|path| invocation_dir.join(path));
    let target_root = cli.target_root.map(|path| invocation_dir.join(path));
    let python = cli.python.map(|path| {
        // A bare name is looked up in PATH
        if path.components().count() > 1 {
            invocation_dir.join(path)
        } else {
            path
        }
    });

    let (config_path, explicit) = match cli.config {
        Some(path) => (invocation_dir.join(path), true),
        None => (project_config_path(&working_dir), false),
    };
    let mut config = load_config(global_config_path().as_deref(), &config_path, explicit)?;

    // Command-line flags override every config file
    config.merge(Config {
        package: PackageConfig {
            name: cli.package_name,
            ..Default::default()
        },
        shim: ShimConfig {
            module: cli.shim_module,
            python,
            manifest,
            ..Default::default()
        },
        ..Default::default()
    });

    let layout = config.layout();
    let package_name = layout.package_name.clone();

    let source: Box<dyn NamespaceSource> = match config.shim.manifest.clone() {
        Some(manifest) => Box::new(ManifestNamespace::new(manifest)),
        None => Box::new(PythonIntrospector::new(config.shim.python.clone())),
    };

    let opts = FinishOptions::new(&working_dir)
        .with_layout(layout)
        .with_rules(config.rules())
        .with_target_root(target_root)
        .with_dry_run(cli.dry_run);

    let result = finish_package(&opts, source.as_ref())?;

    if opts.dry_run {
        println!("[dry-run] Would finish package `{}`:", package_name);
    } else {
        println!("Finished package `{}`:", package_name);
    }
    println!(
        "  Exported: {} of {} symbols ({} hidden)",
        result.accepted.len(),
        result.total_symbols,
        result.rejected
    );
    println!("  Files:    {}", result.moves.len());
    println!("  Location: {}", result.final_location().display());

    if let Some(published) = result.published.as_ref().filter(|p| p.replaced_existing) {
        emit(
            &Diagnostic::warning(format!(
                "replaced existing installation at {}",
                published.destination.display()
            )),
            color,
        );
    }

    Ok(())
}
