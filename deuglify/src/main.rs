use clap::Parser;
use deuglify_lib::{deuglify_files, DeuglifyOptions, LightningMinifier, StyleMode};
use log::error;
use std::path::PathBuf;

const DEUGLIFY_INTRO: &str = r#"
       __                  ___ ____
   ___/ /__ __ _____ _/ (_) _/_ __
  / _  / -_) // / _ `/ / / _/ // /
  \_,_/\__/\_,_/\_, /_/_/_/ \_, /
               /___/       /___/

    Turning hashed utility classes back into readable ones.
"#;

#[derive(Parser)]
#[command(name = "deuglify")]
#[command(about = "Map obfuscated utility classes back to their framework names")]
struct Args {
    /// The framework's full stylesheet.
    tailwind_css: PathBuf,

    /// HTML document to rewrite.
    html: PathBuf,

    /// Stylesheet for the document. Defaults to the document's <style> blocks.
    css: Option<PathBuf>,

    /// Output file name.
    #[arg(short, long, default_value = "out.html")]
    output: PathBuf,

    /// Rename selectors in the document's own stylesheet instead of
    /// generating a fresh one from the mapped rules.
    #[arg(long)]
    rename_styles: bool,
}

impl From<Args> for DeuglifyOptions {
    fn from(args: Args) -> Self {
        DeuglifyOptions {
            tailwind_css_path: args.tailwind_css,
            html_path: args.html,
            css_path: args.css,
            output_path: args.output,
            style_mode: if args.rename_styles {
                StyleMode::RenameExisting
            } else {
                StyleMode::Synthesize
            },
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    println!("{}", DEUGLIFY_INTRO);

    // parse the args given in terminal
    let options: DeuglifyOptions = Args::parse().into();

    match deuglify_files(&options, &LightningMinifier) {
        Ok(output) => {
            println!(
                "Mapped {} classes into {}.",
                output.map.len(),
                options.output_path.display()
            );
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
