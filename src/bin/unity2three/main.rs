//! unity2three CLI - convert Unity scene files to three.js JSON.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use unity2three::scene::{build_scene, SceneGraph};
use unity2three::yaml::parse_documents;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let args: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();

    if args.is_empty() {
        print_help();
        return;
    }

    match args[0] {
        // Convert command - write three.js JSON
        "convert" | "c" => {
            if args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: unity2three convert <scene.unity> [out.json]");
                std::process::exit(1);
            }
            cmd_convert(args[1], args.get(2).copied());
        }

        // Info command - record counts
        "info" | "i" => {
            if args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: unity2three info <scene.unity>");
                std::process::exit(1);
            }
            cmd_info(args[1]);
        }

        // Tree command - reconciled hierarchy
        "tree" | "t" => {
            if args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: unity2three tree <scene.unity>");
                std::process::exit(1);
            }
            cmd_tree(args[1]);
        }

        // Help
        "help" | "h" | "-h" | "--help" => print_help(),

        // Default: if file exists, convert it; otherwise error
        _ => {
            if Path::new(args[0]).exists() {
                cmd_convert(args[0], None);
            } else {
                eprintln!("Unknown command: {}", args[0]);
                eprintln!();
                print_help();
                std::process::exit(1);
            }
        }
    }
}

fn print_help() {
    println!(
        "unity2three {} ({}) - Unity scene to three.js JSON converter",
        env!("CARGO_PKG_VERSION"),
        env!("UNITY2THREE_BUILD_DATE")
    );
    println!();
    println!("USAGE:");
    println!("    unity2three <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    c, convert <scene> [out]      Convert a scene (default out: Build/<scene>.json)");
    println!("    i, info    <scene>            Show record counts");
    println!("    t, tree    <scene>            Show the reconciled object hierarchy");
    println!("    h, help                       Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    unity2three convert Main.unity            # Build/Main.unity.json");
    println!("    unity2three convert Main.unity out.json   # explicit output path");
    println!("    unity2three tree Main.unity               # see the hierarchy");
    println!();
    println!("NOTES:");
    println!("    - Passing a scene file directly is equivalent to 'convert'");
    println!("    - Set RUST_LOG=debug for decode diagnostics");
}

fn cmd_convert(input: &str, output: Option<&str>) {
    info!("Converting scene: {}", input);

    let json = match unity2three::convert_file(input) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to convert {}: {}", input, e);
            std::process::exit(1);
        }
    };

    let out_path = match output {
        Some(path) => PathBuf::from(path),
        None => {
            let name = Path::new(input)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "scene.unity".to_string());
            PathBuf::from("Build").join(format!("{name}.json"))
        }
    };

    if let Some(dir) = out_path.parent() {
        if !dir.as_os_str().is_empty() {
            if let Err(e) = fs::create_dir_all(dir) {
                eprintln!("Failed to create {}: {}", dir.display(), e);
                std::process::exit(1);
            }
        }
    }
    if let Err(e) = fs::write(&out_path, json) {
        eprintln!("Failed to write {}: {}", out_path.display(), e);
        std::process::exit(1);
    }

    println!("{} created", out_path.display());
}

fn load_graph(path: &str) -> SceneGraph {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path, e);
            std::process::exit(1);
        }
    };
    let documents = match parse_documents(&source) {
        Ok(documents) => documents,
        Err(e) => {
            eprintln!("Failed to parse {}: {}", path, e);
            std::process::exit(1);
        }
    };
    match build_scene(&documents) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Failed to build scene graph for {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn cmd_info(path: &str) {
    let graph = load_graph(path);

    println!("Scene: {}", path);
    println!();
    println!("Records:");
    println!("  Game objects: {}", graph.game_objects.len());
    println!("  Transforms:   {}", graph.transforms.len());
    println!("  Cameras:      {}", graph.cameras.len());
    println!("  Lights:       {}", graph.lights.len());
}

fn cmd_tree(path: &str) {
    let graph = load_graph(path);

    println!("Scene: {}", path);
    println!();

    let mut visited = HashSet::new();
    for go in graph.game_objects.values() {
        let is_root = go.transform.as_ref().map(|tf| tf.parent.is_none()).unwrap_or(true);
        if is_root {
            print_tree(&graph, go.handle, 0, &mut visited);
        }
    }
}

fn print_tree(graph: &SceneGraph, handle: i64, depth: usize, visited: &mut HashSet<i64>) {
    // Malformed parentage can be cyclic; the walker must not loop.
    if !visited.insert(handle) {
        return;
    }
    let Some(go) = graph.game_objects.get(&handle) else {
        return;
    };

    let indent = "  ".repeat(depth);
    let kind = if go.camera.is_some() {
        "Camera"
    } else if go.light.is_some() {
        "Light"
    } else {
        "Mesh"
    };
    println!("{}{} [{}]", indent, go.name, kind);

    if let Some(tf) = &go.transform {
        for &child in &tf.children {
            // A child entry may be a transform fileID (declared in the
            // source) or a game-object fileID (added by reconciliation).
            let child_go = graph
                .transforms
                .get(&child)
                .map(|t| t.game_object)
                .unwrap_or(child);
            print_tree(graph, child_go, depth + 1, visited);
        }
    }
}
