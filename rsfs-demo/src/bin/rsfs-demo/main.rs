mod cli;

use std::sync::Arc;

use clap::Parser;
use cli::Cli;
use rsfs::Rsfs;

fn main() -> vfs::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let fs = Arc::new(Rsfs::new(cli.geometry())?);
    println!("geometry={:?}", fs.geometry());

    if !cli.skip_tour {
        for (step, contents) in rsfs_demo::tour(&fs)? {
            println!("{step:<16} => {contents:?}");
        }
    }

    let workload = cli.workload();
    log::info!("run {workload:?}");
    let summary = rsfs_demo::run(&fs, &workload)?;
    println!(
        "reads={} ({} bytes)\nwrites={} ({} bytes)\nmismatches={}",
        summary.reads,
        summary.bytes_read,
        summary.writes,
        summary.bytes_written,
        summary.mismatches
    );

    print!("\n{}", fs.stat());
    Ok(())
}
