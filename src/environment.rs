use crate::collection::Collection;
use crate::var::VarStore;

/// Shell type for export script generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Zsh,
    Bash,
    Fish,
}

impl Shell {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "zsh" => Some(Shell::Zsh),
            "bash" => Some(Shell::Bash),
            "fish" => Some(Shell::Fish),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Shell::Zsh => "zsh",
            Shell::Bash => "bash",
            Shell::Fish => "fish",
        }
    }
}

/// Resolved vars of a collection ready to be exported into a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    entries: Vec<(String, String)>,
}

impl Environment {
    /// Resolve a collection against the current var store
    pub fn from_collection(collection: &Collection, store: &VarStore) -> Self {
        Self {
            entries: collection
                .vars(store)
                .into_iter()
                .map(|var| (var.key.clone(), var.value.clone()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Format the environment for the given shell
    pub fn format_for_shell(&self, shell: Shell) -> String {
        self.entries
            .iter()
            .map(|(key, value)| match shell {
                Shell::Zsh | Shell::Bash => format!("export {}={}", key, quote(value)),
                Shell::Fish => format!("set -gx {} {}", key, quote(value)),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Single-quote a value so no shell expansion happens
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}
