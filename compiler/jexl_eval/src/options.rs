//! Evaluation policy knobs.

use jexl_ir::{Literal, Pragma};
use tracing::debug;

/// Error-handling and resource policy for one evaluation.
///
/// - `strict`: unresolved names, members and indices are errors rather
///   than nil
/// - `safe`: navigating through nil yields nil rather than `NilAccess`
/// - `silent`: any error from the evaluation call becomes nil
/// - `cancellable`: a raised cancellation token fails with `Cancelled`;
///   otherwise evaluation stops and yields nil
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    pub strict: bool,
    pub safe: bool,
    pub silent: bool,
    pub cancellable: bool,
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            strict: false,
            safe: true,
            silent: false,
            cancellable: true,
            max_depth: 2048,
        }
    }
}

impl Options {
    /// Apply `jexl.*` pragmas of a script on top of these options.
    ///
    /// Recognized keys: `jexl.strict`, `jexl.safe`, `jexl.silent`,
    /// `jexl.cancellable` (booleans). Other pragmas are left to the
    /// embedder.
    #[must_use]
    pub fn with_pragmas(mut self, pragmas: &[Pragma]) -> Self {
        for pragma in pragmas {
            let Literal::Bool(flag) = pragma.value else {
                continue;
            };
            let slot = match pragma.key.as_str() {
                "jexl.strict" => &mut self.strict,
                "jexl.safe" => &mut self.safe,
                "jexl.silent" => &mut self.silent,
                "jexl.cancellable" => &mut self.cancellable,
                _ => continue,
            };
            debug!(key = %pragma.key, flag, "pragma overrides option");
            *slot = flag;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use jexl_ir::Number;
    use pretty_assertions::assert_eq;

    use super::*;

    fn pragma(key: &str, value: Literal) -> Pragma {
        Pragma {
            key: key.to_string(),
            value,
        }
    }

    #[test]
    fn pragmas_override_flags() {
        let options = Options::default().with_pragmas(&[
            pragma("jexl.strict", Literal::Bool(true)),
            pragma("jexl.safe", Literal::Bool(false)),
            pragma("jexl.silent", Literal::Number(Number::one())),
            pragma("app.mode", Literal::Bool(true)),
        ]);
        assert_eq!(
            options,
            Options {
                strict: true,
                safe: false,
                ..Options::default()
            }
        );
    }
}
