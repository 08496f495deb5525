//! Writing canonical documents to the output directory

use crate::config::{OutputConfig, OutputMode};
use anyhow::{Context, Result};
use relcanon_ir::canonical::CanonicalDocument;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Write `document` according to `config`, returning the files written.
pub fn write_document(document: &CanonicalDocument, config: &OutputConfig) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&config.directory)
        .with_context(|| format!("failed to create output directory {}", config.directory.display()))?;

    match config.mode {
        OutputMode::Combined => {
            let path = config.directory.join("plans.json");
            write_json(&path, document, config.pretty)?;
            Ok(vec![path])
        }
        OutputMode::Pairs => {
            if document.queries.len() < 2 {
                warn!(queries = document.queries.len(), "pairs mode needs at least two statements");
            }

            let mut written = Vec::new();
            for (i, pair) in document.pairs().iter().enumerate() {
                let index = i + 1;
                let identical = pair.queries[0].fingerprint() == pair.queries[1].fingerprint();
                info!(pair = index, identical, "comparing statement 0 with statement {}", index);

                let path = config.directory.join(format!("pair_{}.json", index));
                write_json(&path, pair, config.pretty)?;
                written.push(path);
            }
            Ok(written)
        }
    }
}

fn write_json(path: &Path, document: &CanonicalDocument, pretty: bool) -> Result<()> {
    let json = document.to_json(pretty).context("failed to serialize canonical document")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use relcanon_ir::canonical::{PlanDoc, TableDoc};
    use relcanon_ir::SqlType;

    fn document() -> CanonicalDocument {
        CanonicalDocument {
            schemas: vec![TableDoc { types: vec![SqlType::Integer] }],
            queries: vec![PlanDoc::Scan(0), PlanDoc::Scan(0).distinct(), PlanDoc::Scan(0)],
        }
    }

    fn temp_output(name: &str, mode: OutputMode) -> OutputConfig {
        let directory = std::env::temp_dir().join(name);
        std::fs::remove_dir_all(&directory).ok();
        OutputConfig { mode, directory, pretty: false }
    }

    #[test]
    fn test_combined_writes_plans_json() {
        let config = temp_output("relcanon_test_combined", OutputMode::Combined);
        let written = write_document(&document(), &config).unwrap();

        assert_eq!(written, vec![config.directory.join("plans.json")]);
        let contents = std::fs::read_to_string(&written[0]).unwrap();
        assert_eq!(
            contents,
            r#"{"schemas":[{"types":["INTEGER"]}],"queries":[{"scan":0},{"distinct":{"scan":0}},{"scan":0}]}"#
        );

        std::fs::remove_dir_all(&config.directory).ok();
    }

    #[test]
    fn test_pairs_writes_one_file_per_later_statement() {
        let config = temp_output("relcanon_test_pairs", OutputMode::Pairs);
        let written = write_document(&document(), &config).unwrap();

        assert_eq!(
            written,
            vec![config.directory.join("pair_1.json"), config.directory.join("pair_2.json")]
        );
        let second = std::fs::read_to_string(&written[1]).unwrap();
        assert_eq!(
            second,
            r#"{"schemas":[{"types":["INTEGER"]}],"queries":[{"scan":0},{"scan":0}]}"#
        );

        std::fs::remove_dir_all(&config.directory).ok();
    }

    #[test]
    fn test_pairs_with_single_statement_writes_nothing() {
        let config = temp_output("relcanon_test_single_pair", OutputMode::Pairs);
        let single = CanonicalDocument {
            schemas: vec![],
            queries: vec![PlanDoc::Scan(0)],
        };
        assert!(write_document(&single, &config).unwrap().is_empty());

        std::fs::remove_dir_all(&config.directory).ok();
    }
}
