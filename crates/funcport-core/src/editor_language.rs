//! Editor language inference from file names.

/// Syntax highlighting language for the editor pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorLanguage {
    #[default]
    Plaintext,
    Bat,
    CSharp,
    FSharp,
    JavaScript,
    Json,
    Markdown,
    PowerShell,
    Python,
    TypeScript,
}

impl EditorLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorLanguage::Plaintext => "plaintext",
            EditorLanguage::Bat => "bat",
            EditorLanguage::CSharp => "csharp",
            EditorLanguage::FSharp => "fsharp",
            EditorLanguage::JavaScript => "javascript",
            EditorLanguage::Json => "json",
            EditorLanguage::Markdown => "markdown",
            EditorLanguage::PowerShell => "powershell",
            EditorLanguage::Python => "python",
            EditorLanguage::TypeScript => "typescript",
        }
    }
}

/// Infer the language from a file name's extension. Unknown extensions (and
/// extensionless names) are plaintext.
pub fn language_for_file(file_name: &str) -> EditorLanguage {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "bat" => EditorLanguage::Bat,
        "cs" | "csx" => EditorLanguage::CSharp,
        "fs" | "fsx" => EditorLanguage::FSharp,
        "js" => EditorLanguage::JavaScript,
        "json" => EditorLanguage::Json,
        "md" => EditorLanguage::Markdown,
        "ps1" | "psm1" => EditorLanguage::PowerShell,
        "py" => EditorLanguage::Python,
        "ts" => EditorLanguage::TypeScript,
        _ => EditorLanguage::Plaintext,
    }
}
