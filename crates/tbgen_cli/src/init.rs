//! `tbgen init`: write a default `tbgen.toml`.

use std::fs;
use std::path::PathBuf;

use tbgen_config::{default_config_text, CONFIG_FILE_NAME};

use crate::GlobalArgs;

/// Runs the `tbgen init` command.
///
/// Writes `tbgen.toml` into `dir` (default: the current directory), creating
/// the directory if needed. An existing file is never replaced.
pub fn run(dir: Option<PathBuf>, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(format!("{} already exists", path.display()).into());
    }

    fs::create_dir_all(&dir)?;
    fs::write(&path, default_config_text())?;
    if !global.quiet {
        eprintln!("     Created {}", path.display());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            color: false,
            config: None,
        }
    }

    #[test]
    fn writes_loadable_config() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("proj");
        assert_eq!(run(Some(dir.clone()), &quiet()).unwrap(), 0);

        let path = dir.join(CONFIG_FILE_NAME);
        let config = tbgen_config::load_config(&path).unwrap();
        assert_eq!(config.testbench, tbgen_config::TestbenchConfig::default());
        assert!(config.parameters.is_empty());
    }

    #[test]
    fn refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[testbench]\nrun_cycles = 7\n").unwrap();

        let err = run(Some(tmp.path().to_path_buf()), &quiet()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "[testbench]\nrun_cycles = 7\n");
    }
}
