use std::{
    fs::{self, File},
    io::{self, BufWriter, Read as _, Write},
    path::Path,
};

use anyhow::Context;
use columns_evaluator::{catalog::MoveCatalog, network::FeedForwardStrategy};
use columns_training::arena::ArenaConfig;

/// Destination of a command's output: stdout or a buffered file.
pub struct Output {
    writer: Box<dyn Write>,
    label: String,
}

impl Output {
    pub fn stdout() -> Self {
        Self {
            writer: Box::new(io::stdout().lock()),
            label: "stdout".to_owned(),
        }
    }

    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
            label: path.display().to_string(),
        })
    }

    /// A file when `path` is given, stdout otherwise.
    pub fn to(path: Option<&Path>) -> anyhow::Result<Self> {
        path.map_or_else(|| Ok(Self::stdout()), Self::create)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Write `value` as pretty JSON to a new file at `path`
pub fn save_json<T>(value: &T, path: &Path) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let mut output = Output::create(path)?;
    serde_json::to_writer_pretty(&mut output, value)
        .map_err(io::Error::from)
        .and_then(|()| writeln!(output))
        .and_then(|()| output.flush())
        .with_context(|| format!("Failed to write JSON to {}", path.display()))
}

fn read_json_file<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {file_kind} file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

/// Read a text file, or all of stdin when `path` is `None`
pub fn read_text_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Read arena configuration, falling back to defaults when no file is given
pub fn read_arena_config(path: Option<&Path>) -> anyhow::Result<ArenaConfig> {
    match path {
        Some(path) => read_json_file("arena config", path),
        None => Ok(ArenaConfig::default()),
    }
}

/// Read a catalog file, falling back to the standard catalog when no file is given
pub fn read_catalog_file(path: Option<&Path>) -> anyhow::Result<MoveCatalog> {
    let Some(path) = path else {
        return Ok(MoveCatalog::standard());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    MoveCatalog::from_lines(&text)
        .with_context(|| format!("Failed to parse catalog file: {}", path.display()))
}

/// Read a strategy network from a JSON file
pub fn read_strategy_file(path: &Path) -> anyhow::Result<FeedForwardStrategy> {
    read_json_file("strategy", path)
}

pub fn create_dir(path: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}
