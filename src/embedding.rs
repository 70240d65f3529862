//! Word embedding store backed by word2vec text-format vector files.
//!
//! The store is a read-only token → vector map. Vector width is fixed at
//! load time; a row with a different width is a load error, never coerced.

use ndarray::Array1;
use std::collections::HashMap;
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};

/// A fixed-width token → vector map loaded from a word2vec text file.
pub struct WordVectors {
    dim: usize,
    vectors: HashMap<String, Array1<f64>>,
}

impl WordVectors {
    /// Create an empty store with the given vector width.
    pub fn new(dim: usize) -> Self {
        WordVectors {
            dim,
            vectors: HashMap::new(),
        }
    }

    /// Load vectors from a word2vec text-format file.
    ///
    /// Accepts the standard format: an optional `count dim` header line,
    /// then one `token v1 v2 ... vn` row per word. Every row must carry
    /// exactly the same number of components.
    pub fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let file = File::open(path)
            .map_err(|e| format!("cannot open embedding model {}: {}", path, e))?;
        let reader = BufReader::new(file);

        let mut dim = 0usize;
        let mut vectors = HashMap::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let mut parts = line.split_whitespace();
            let token = match parts.next() {
                Some(t) => t,
                None => continue,
            };
            let values: Vec<f64> = parts
                .map(str::parse)
                .collect::<Result<_, _>>()
                .map_err(|e| format!("{}:{}: bad vector component: {}", path, line_no + 1, e))?;

            // Header line: "count dim" with no token payload.
            if line_no == 0 && values.len() == 1 && token.parse::<usize>().is_ok() {
                dim = values[0] as usize;
                continue;
            }

            if dim == 0 {
                dim = values.len();
            }
            if values.len() != dim {
                return Err(format!(
                    "{}:{}: vector for {:?} has width {} but the model width is {}",
                    path,
                    line_no + 1,
                    token,
                    values.len(),
                    dim
                )
                .into());
            }
            vectors.insert(token.to_string(), Array1::from(values));
        }

        if vectors.is_empty() {
            return Err(format!("embedding model {} contains no vectors", path).into());
        }

        Ok(WordVectors { dim, vectors })
    }

    /// Insert a token vector. Errors if the width does not match the store.
    pub fn insert(&mut self, token: &str, values: Vec<f64>) -> Result<(), Box<dyn Error>> {
        if values.len() != self.dim {
            return Err(format!(
                "vector for {:?} has width {} but the store width is {}",
                token,
                values.len(),
                self.dim
            )
            .into());
        }
        self.vectors.insert(token.to_string(), Array1::from(values));
        Ok(())
    }

    /// Look up a token's vector; `None` when out of vocabulary.
    pub fn lookup(&self, token: &str) -> Option<&Array1<f64>> {
        self.vectors.get(token)
    }

    /// Whether the token is in the vocabulary.
    pub fn contains(&self, token: &str) -> bool {
        self.vectors.contains_key(token)
    }

    /// Iterate the known tokens.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.vectors.keys().map(String::as_str)
    }

    /// Vector width.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of tokens in the vocabulary.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
