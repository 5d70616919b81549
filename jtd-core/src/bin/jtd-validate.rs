/// CLI: validates a JSON instance against a JTD schema, printing the
/// resulting error list as JSON.
///
/// Usage:
///   jtd-validate schema.json instance.json
///   jtd-validate --max-errors 5 schema.json instance.json
use std::io::Read;

fn read_json(path: &str) -> serde_json::Value {
    let raw = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Cannot read {path}: {e}");
        std::process::exit(1);
    });
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        eprintln!("Invalid JSON in {path}: {e}");
        std::process::exit(1);
    })
}

fn read_json_stdin() -> serde_json::Value {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .unwrap_or_else(|e| {
            eprintln!("Cannot read stdin: {e}");
            std::process::exit(1);
        });
    serde_json::from_str(&buf).unwrap_or_else(|e| {
        eprintln!("Invalid JSON on stdin: {e}");
        std::process::exit(1);
    })
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut max_errors: Option<usize> = None;
    let mut paths: Vec<&str> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--max-errors" | "-n" => {
                i += 1;
                if i < args.len() {
                    max_errors = args[i].parse().ok();
                }
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: jtd-validate [--max-errors N] <schema.json> [instance.json]"
                );
                eprintln!("  If instance.json is omitted, the instance is read from stdin.");
                std::process::exit(0);
            }
            path => paths.push(path),
        }
        i += 1;
    }

    let schema_path = paths.first().unwrap_or_else(|| {
        eprintln!("Missing schema file argument.");
        std::process::exit(1);
    });

    let schema = read_json(schema_path);
    let instance = match paths.get(1) {
        Some(path) => read_json(path),
        None => read_json_stdin(),
    };

    let root = jtd_core::compile(&schema).unwrap_or_else(|e| {
        eprintln!("Invalid JTD schema: {e}");
        std::process::exit(1);
    });

    let errors = match max_errors {
        Some(limit) => jtd_core::validate_with_limit(&root, &instance, limit),
        None => jtd_core::validate(&root, &instance),
    };

    let out: Vec<_> = errors
        .iter()
        .map(|e| {
            serde_json::json!({
                "instancePath": e.instance_path,
                "schemaPath": e.schema_path,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&out).unwrap());

    if !errors.is_empty() {
        std::process::exit(1);
    }
}
