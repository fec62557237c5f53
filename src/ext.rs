use std::path::Path;

use anyhow::{Context, Result};

#[extend::ext(name = StrExt)]
pub impl str {
  /// Drops parentheses, so `get_(hit)` becomes `get_hit`.
  fn strip_parens(&self) -> String {
    self.chars().filter(|c| !matches!(c, '(' | ')')).collect()
  }

  /// Title form of a dataset or subset name: no parentheses, underscores as
  /// spaces.
  fn humanize(&self) -> String {
    self.strip_parens().replace('_', " ")
  }
}

#[extend::ext(name = PathExt)]
pub impl Path {
  fn is_csv(&self) -> bool {
    self.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
  }

  /// File name without its extension.
  fn stem_string(&self) -> Result<String> {
    Ok(self.file_stem().context("file stem")?.to_string_lossy().into_owned())
  }
}
