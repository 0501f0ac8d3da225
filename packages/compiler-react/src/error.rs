use thiserror::Error;

/// Rejected compile options. Document content never fails to compile.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("invalid component name `{0}`: expected an identifier starting with an uppercase letter")]
    InvalidComponentName(String),

    #[error("import module must not be empty")]
    EmptyImportModule,
}
