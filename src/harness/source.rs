use crate::utils::error::{ContactError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// One row of text arguments handed to a parameterized case.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Arguments(Vec<String>);

impl Arguments {
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

impl From<&str> for Arguments {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl From<String> for Arguments {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<String>> for Arguments {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

/// Resolves packaged resources such as `/data.csv` against a root directory.
#[derive(Debug, Clone)]
pub struct ResourceLoader {
    root: PathBuf,
}

impl ResourceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The `resources/` directory shipped next to this crate's manifest.
    pub fn crate_resources() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("resources"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, resource: &str) -> PathBuf {
        self.root.join(resource.trim_start_matches('/'))
    }

    pub fn read_to_string(&self, resource: &str) -> Result<String> {
        let path = self.resolve(resource);
        if !path.is_file() {
            return Err(ContactError::ResourceNotFound {
                path: resource.to_string(),
            });
        }
        tracing::debug!("Loading resource {} from {}", resource, path.display());
        Ok(std::fs::read_to_string(path)?)
    }
}

type Provider = Box<dyn Fn() -> Vec<Arguments>>;

/// Where a parameterized case draws its rows from.
pub enum Source {
    /// Inline literals, one argument per row.
    Values(Vec<String>),
    /// A provider function called when the case runs.
    Method(Provider),
    /// Inline CSV rows; `'` is the quote character.
    Csv(Vec<String>),
    /// A CSV resource; `"` quotes values and `#` starts a comment line.
    CsvFile {
        resource: String,
        num_lines_to_skip: usize,
    },
}

impl Source {
    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Source::Values(values.into_iter().map(Into::into).collect())
    }

    pub fn method<T, F>(provider: F) -> Self
    where
        T: Into<Arguments>,
        F: Fn() -> Vec<T> + 'static,
    {
        Source::Method(Box::new(move || {
            provider().into_iter().map(Into::into).collect::<Vec<Arguments>>()
        }))
    }

    pub fn csv<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Source::Csv(rows.into_iter().map(Into::into).collect())
    }

    pub fn csv_file(resource: impl Into<String>) -> Self {
        Source::CsvFile {
            resource: resource.into(),
            num_lines_to_skip: 0,
        }
    }

    pub fn csv_file_skipping(resource: impl Into<String>, num_lines_to_skip: usize) -> Self {
        Source::CsvFile {
            resource: resource.into(),
            num_lines_to_skip,
        }
    }

    pub fn rows(&self, loader: &ResourceLoader) -> Result<Vec<Arguments>> {
        match self {
            Source::Values(values) => Ok(values.iter().map(|v| Arguments::from(v.as_str())).collect()),
            Source::Method(provider) => Ok(provider()),
            Source::Csv(rows) => parse_csv(&rows.join("\n"), b'\'', None, 0),
            Source::CsvFile {
                resource,
                num_lines_to_skip,
            } => {
                let content = loader.read_to_string(resource)?;
                parse_csv(&content, b'"', Some(b'#'), *num_lines_to_skip)
            }
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Values(values) => f.debug_tuple("Values").field(values).finish(),
            Source::Method(_) => f.write_str("Method(..)"),
            Source::Csv(rows) => f.debug_tuple("Csv").field(rows).finish(),
            Source::CsvFile {
                resource,
                num_lines_to_skip,
            } => f
                .debug_struct("CsvFile")
                .field("resource", resource)
                .field("num_lines_to_skip", num_lines_to_skip)
                .finish(),
        }
    }
}

fn parse_csv(content: &str, quote: u8, comment: Option<u8>, skip: usize) -> Result<Vec<Arguments>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .quote(quote)
        .comment(comment)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records().skip(skip) {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(Arguments::new(record.iter().map(str::to_string).collect()));
    }
    Ok(rows)
}
