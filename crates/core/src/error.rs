use leon::RenderError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error trying to {} file at `{}`: {}", .action, .path, .original)]
    Io {
        action: String,
        path: String,
        original: std::io::Error,
    },

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),

    #[error("YAML error: {}", .0)]
    Yaml(#[from] serde_yaml::Error),

    #[error("Error reading YAML file at `{}`: {}", .path, .original)]
    YamlFile {
        path: String,
        original: serde_yaml::Error,
    },

    #[error("Error reading flags: {}", .0)]
    Flags(#[from] clap::Error),

    #[error("Error rendering help text template: {}", .0)]
    Render(#[from] RenderError),

    #[error("Misc error: {}", .0)]
    Misc(String),
}

impl Error {
    pub fn io_error(action: &str, path: impl Into<String>, original: std::io::Error) -> Self {
        Self::Io {
            action: action.to_string(),
            path: path.into(),
            original,
        }
    }

    pub fn yaml_file_error(path: impl Into<String>, original: serde_yaml::Error) -> Self {
        Self::YamlFile {
            path: path.into(),
            original,
        }
    }
}
