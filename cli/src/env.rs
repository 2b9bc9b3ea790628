use std::path::{Path, PathBuf};

use crate::error::{ConfigureError, Result};
use crate::redirector::RedirectorPaths;

pub const ROOT_CONFIG_FILE: &str = "/etc/fsctl/config.json";
pub const ROOT_REDIRECTOR_MOUNT: &str = "/fsctl";
pub const REDIRECTOR_BINARY: &str = "fsctl-redirector";

const CONFIG_FILE_VAR: &str = "FSCTL_CONFIG_FILE";
const ROOT_CONFIG_FILE_VAR: &str = "FSCTL_ROOT_CONFIG_FILE";
const REDIRECTOR_MOUNT_VAR: &str = "FSCTL_REDIRECTOR_MOUNT";

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("fsctl")
}

pub fn user_config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Locations resolved once per invocation from flags, environment and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Env {
    user_config_file: PathBuf,
    root_config_file: PathBuf,
    redirector_mount: PathBuf,
    use_root_config: bool,
}

impl Env {
    pub fn new(config_file: Option<PathBuf>, use_root_config: bool) -> Self {
        Self::resolve(config_file, use_root_config, |name| std::env::var(name).ok())
    }

    fn resolve(
        config_file: Option<PathBuf>,
        use_root_config: bool,
        var: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let user_config_file = config_file
            .or_else(|| var(CONFIG_FILE_VAR).map(PathBuf::from))
            .unwrap_or_else(user_config_path);
        let root_config_file = var(ROOT_CONFIG_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(ROOT_CONFIG_FILE));
        let redirector_mount = var(REDIRECTOR_MOUNT_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(ROOT_REDIRECTOR_MOUNT));

        Self {
            user_config_file,
            root_config_file,
            redirector_mount,
            use_root_config,
        }
    }

    /// The config file commands read and write.
    pub fn config_file(&self) -> &Path {
        if self.use_root_config {
            &self.root_config_file
        } else {
            &self.user_config_file
        }
    }

    pub fn root_config_file(&self) -> &Path {
        &self.root_config_file
    }

    pub fn root_config_dir(&self) -> &Path {
        self.root_config_file.parent().unwrap_or(Path::new("/"))
    }

    pub fn require_root_config(&self) -> Result<()> {
        if self.config_file() != self.root_config_file() {
            return Err(ConfigureError::PrivilegeConfig(
                "Must pass --use-root-config-file to fsctl.".to_string(),
            ));
        }
        if self.root_config_file.as_os_str().is_empty() {
            return Err(ConfigureError::PrivilegeConfig(
                "Root config file nonexistent for this operating system.".to_string(),
            ));
        }
        Ok(())
    }

    pub fn redirector_paths(&self) -> RedirectorPaths {
        RedirectorPaths {
            config_file: self.root_config_file.clone(),
            config_dir: self.root_config_dir().to_path_buf(),
            mount: self.redirector_mount.clone(),
            binary_name: REDIRECTOR_BINARY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let env = Env::resolve(None, false, vars(&[]));
        assert_eq!(env.root_config_file(), Path::new(ROOT_CONFIG_FILE));
        assert_eq!(env.root_config_dir(), Path::new("/etc/fsctl"));
        assert_eq!(env.redirector_paths().mount, PathBuf::from(ROOT_REDIRECTOR_MOUNT));
        assert_eq!(env.config_file(), user_config_path().as_path());
    }

    #[test]
    fn test_flag_overrides_environment() {
        let env = Env::resolve(
            Some(PathBuf::from("/flag/config.json")),
            false,
            vars(&[(CONFIG_FILE_VAR, "/env/config.json")]),
        );
        assert_eq!(env.config_file(), Path::new("/flag/config.json"));

        let env = Env::resolve(None, false, vars(&[(CONFIG_FILE_VAR, "/env/config.json")]));
        assert_eq!(env.config_file(), Path::new("/env/config.json"));
    }

    #[test]
    fn test_root_config_requires_opt_in() {
        let env = Env::resolve(None, false, vars(&[]));
        let err = env.require_root_config().unwrap_err();
        assert!(matches!(err, ConfigureError::PrivilegeConfig(_)));
        assert!(err.to_string().contains("--use-root-config-file"));

        let env = Env::resolve(Some(PathBuf::from("/tmp/user.json")), true, vars(&[]));
        assert_eq!(env.config_file(), Path::new(ROOT_CONFIG_FILE));
        assert!(env.require_root_config().is_ok());
    }

    #[test]
    fn test_empty_root_config_is_rejected() {
        let env = Env::resolve(None, true, vars(&[(ROOT_CONFIG_FILE_VAR, "")]));
        let err = env.require_root_config().unwrap_err();
        assert!(err.to_string().contains("nonexistent"));
    }

    #[test]
    fn test_redirector_paths_follow_overrides() {
        let env = Env::resolve(
            None,
            true,
            vars(&[
                (ROOT_CONFIG_FILE_VAR, "/srv/etc/config.json"),
                (REDIRECTOR_MOUNT_VAR, "/srv/mount"),
            ]),
        );
        let paths = env.redirector_paths();
        assert_eq!(paths.config_file, PathBuf::from("/srv/etc/config.json"));
        assert_eq!(paths.config_dir, PathBuf::from("/srv/etc"));
        assert_eq!(paths.mount, PathBuf::from("/srv/mount"));
        assert_eq!(paths.binary_name, REDIRECTOR_BINARY);
    }
}
