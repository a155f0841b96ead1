//! Grammar capabilities consulted by the parser.

use bitflags::bitflags;

bitflags! {
    /// Constructs the parser accepts.
    ///
    /// A disabled construct is rejected at parse time with an error naming
    /// the feature.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Features: u16 {
        /// `for`, `while`, `do`.
        const LOOPS = 1 << 0;
        /// `(a, b) -> body` and `x -> body`.
        const LAMBDA = 1 << 1;
        /// `var x = ...`.
        const LOCAL_VAR = 1 << 2;
        /// `obj.method(args)`.
        const METHOD_CALL = 1 << 3;
        /// `new(className, args...)`.
        const NEW_INSTANCE = 1 << 4;
        /// Array, map and set literals.
        const STRUCTURED_LITERAL = 1 << 5;
        /// `#pragma key value`.
        const PRAGMA = 1 << 6;
        /// `@name(args) statement`.
        const ANNOTATION = 1 << 7;
        /// Multi-statement scripts; off restricts scripts to one expression.
        const SCRIPT = 1 << 8;
        /// Assignment, compound assignment, increments.
        const SIDE_EFFECT = 1 << 9;
        /// Redeclaring a `var` in the same block is an error.
        const LEXICAL = 1 << 10;
        /// A `var` may not shadow a local of an enclosing block.
        const LEXICAL_SHADE = 1 << 11;
        /// `eq ne lt le gt ge and or not`.
        const COMPARATOR_NAMES = 1 << 12;
    }
}

impl Features {
    /// Name used in "feature disabled" diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            f if f == Features::LOOPS => "loops",
            f if f == Features::LAMBDA => "lambdas",
            f if f == Features::LOCAL_VAR => "local variables",
            f if f == Features::METHOD_CALL => "method calls",
            f if f == Features::NEW_INSTANCE => "new instance",
            f if f == Features::STRUCTURED_LITERAL => "structured literals",
            f if f == Features::PRAGMA => "pragmas",
            f if f == Features::ANNOTATION => "annotations",
            f if f == Features::SCRIPT => "scripts",
            f if f == Features::SIDE_EFFECT => "side effects",
            f if f == Features::COMPARATOR_NAMES => "comparator names",
            _ => "feature",
        }
    }
}

impl Default for Features {
    fn default() -> Self {
        Features::all() - Features::LEXICAL - Features::LEXICAL_SHADE
    }
}
