use std::env;
use std::error::Error;
use std::process::ExitCode;

use log::debug;
use toolshelf::shared::catalog;
use toolshelf::{Category, RootNode, ThemeConfig, ThemeStore};

const USAGE: &str = "usage: toolshelf <theme | toggle | tools [category]>";

fn main() -> Result<ExitCode, Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{USAGE}");
        return Ok(ExitCode::from(2));
    };

    match command.as_str() {
        "theme" | "toggle" => {
            let config = ThemeConfig::from_env();
            debug!("using preferences file {}", config.prefs_path.display());
            let root = RootNode::new();
            let handle = ThemeStore::from_config(&config, root.clone()).into_handle();
            handle.initialize();

            let mode = if command == "toggle" {
                handle.toggle()
            } else {
                handle.current()
            };
            println!("{mode}");
            if command == "toggle" {
                let marker = root.attribute(&config.marker_attribute).unwrap_or_default();
                println!("{}={marker} class={}", config.marker_attribute, root.classes().join(" "));
            }
        }
        "tools" => {
            let categories = match args.get(1) {
                Some(name) => match Category::parse(name) {
                    Some(category) => vec![category],
                    None => {
                        eprintln!("unknown category {name:?}");
                        return Ok(ExitCode::from(2));
                    }
                },
                None => catalog::categories(),
            };
            for category in categories {
                println!("[{category}]");
                for tool in catalog::by_category(category) {
                    println!("  {:<30} {:<32} {}", tool.name, tool.path, tool.description);
                }
            }
        }
        _ => {
            eprintln!("{USAGE}");
            return Ok(ExitCode::from(2));
        }
    }

    Ok(ExitCode::SUCCESS)
}
