//! Benchmark Tree
//!
//! Benchmarks are declared as a tree of named groups and leaves, then
//! flattened into `(qualified name, Benchmarkable)` pairs. Qualified names
//! join ancestor names with `/`; empty names are skipped, so an unnamed
//! group adds no path segment.

use crate::benchmarkable::Benchmarkable;

/// A benchmark or a named collection of benchmarks
#[derive(Debug)]
pub enum Benchmark {
    /// One unit of work
    Leaf {
        /// Name relative to the enclosing group
        name: String,
        /// Work to time
        benchmarkable: Benchmarkable,
    },
    /// Named, ordered collection
    Group {
        /// Prefix contributed to every descendant's name
        name: String,
        /// Children in declaration order
        children: Vec<Benchmark>,
    },
}

/// Create a leaf
pub fn bench(name: impl Into<String>, benchmarkable: Benchmarkable) -> Benchmark {
    Benchmark::Leaf {
        name: name.into(),
        benchmarkable,
    }
}

/// Create a group
pub fn group(name: impl Into<String>, children: Vec<Benchmark>) -> Benchmark {
    Benchmark::Group {
        name: name.into(),
        children,
    }
}

impl Benchmark {
    /// This node's own (unqualified) name
    pub fn name(&self) -> &str {
        match self {
            Benchmark::Leaf { name, .. } | Benchmark::Group { name, .. } => name,
        }
    }

    /// Qualified names of every leaf, in declaration order
    pub fn names(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.visit_names("", &mut out);
        out
    }

    fn visit_names(&self, prefix: &str, out: &mut Vec<String>) {
        let qualified = qualify(prefix, self.name());
        match self {
            Benchmark::Leaf { .. } => out.push(qualified),
            Benchmark::Group { children, .. } => {
                for child in children {
                    child.visit_names(&qualified, out);
                }
            }
        }
    }

    /// Consume the tree into `(qualified name, benchmarkable)` pairs in
    /// declaration order.
    pub fn flatten(self) -> Vec<(String, Benchmarkable)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into(self, prefix: &str, out: &mut Vec<(String, Benchmarkable)>) {
        match self {
            Benchmark::Leaf {
                name,
                benchmarkable,
            } => out.push((qualify(prefix, &name), benchmarkable)),
            Benchmark::Group { name, children } => {
                let qualified = qualify(prefix, &name);
                for child in children {
                    child.flatten_into(&qualified, out);
                }
            }
        }
    }
}

/// Flatten a forest of top-level benchmarks
pub fn flatten_all(benchmarks: Vec<Benchmark>) -> Vec<(String, Benchmarkable)> {
    benchmarks.into_iter().flat_map(Benchmark::flatten).collect()
}

fn qualify(prefix: &str, name: &str) -> String {
    match (prefix.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}/{name}"),
    }
}
