//! Static export: writes every widget, in its initial state, to `<tag>.svg`.
//!
//! Usage: `vw-export [OUT_DIR] [--dark]` (default `OUT_DIR` is `widgets`).

use std::path::{Path, PathBuf};
use vw_editor::{WidgetConfig, WidgetEngine, WidgetKind};

struct Args {
    out_dir: PathBuf,
    dark: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut out_dir = None;
    let mut dark = false;
    for arg in args {
        match arg.as_str() {
            "--dark" => dark = true,
            flag if flag.starts_with("--") => return Err(format!("Unknown flag {flag}")),
            _ if out_dir.is_some() => return Err(format!("Unexpected argument {arg}")),
            _ => out_dir = Some(PathBuf::from(&arg)),
        }
    }
    Ok(Args {
        out_dir: out_dir.unwrap_or_else(|| PathBuf::from("widgets")),
        dark,
    })
}

fn export_all(out_dir: &Path, dark: bool) -> Result<usize, String> {
    std::fs::create_dir_all(out_dir)
        .map_err(|e| format!("Cannot create {}: {e}", out_dir.display()))?;

    let config = WidgetConfig {
        dark,
        ..WidgetConfig::default()
    };
    for kind in WidgetKind::ALL {
        let engine = WidgetEngine::new(kind, config);
        let path = out_dir.join(format!("{}.svg", kind.tag()));
        std::fs::write(&path, engine.render_svg())
            .map_err(|e| format!("Cannot write {}: {e}", path.display()))?;
        log::info!("wrote {}", path.display());
    }
    Ok(WidgetKind::ALL.len())
}

fn run() -> Result<(), String> {
    let args = parse_args(std::env::args().skip(1))?;
    let count = export_all(&args.out_dir, args.dark)?;
    println!("Exported {count} widgets to {}", args.out_dir.display());
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("vw-export: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults() {
        let a = args(&[]).unwrap();
        assert_eq!(a.out_dir, PathBuf::from("widgets"));
        assert!(!a.dark);
    }

    #[test]
    fn dir_and_dark_in_any_order() {
        let a = args(&["--dark", "out"]).unwrap();
        assert_eq!(a.out_dir, PathBuf::from("out"));
        assert!(a.dark);
    }

    #[test]
    fn rejects_unknown_flags_and_extra_dirs() {
        assert!(args(&["--light"]).is_err());
        assert!(args(&["a", "b"]).is_err());
    }

    #[test]
    fn writes_one_file_per_widget() {
        let dir = std::env::temp_dir().join(format!("vw-export-test-{}", std::process::id()));
        assert_eq!(export_all(&dir, false), Ok(7));
        let svg = std::fs::read_to_string(dir.join("vector-cross.svg")).unwrap();
        assert!(svg.starts_with("<svg"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
