use crate::detail::collaborators::{EditorOption, EditorSurface, ModeInfo, ModeLookup, SyntaxMode};
use once_cell::sync::Lazy;
use syntect::parsing::{SyntaxReference, SyntaxSet};

pub(crate) static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

/// Applies a lookup result to the editor.
///
/// Every path that changes the syntax (selecting a file, renaming it, picking
/// a language) goes through here so they cannot drift apart.
pub fn apply_mode<E>(editor: &mut E, resolved: Option<ModeInfo>) -> SyntaxMode
where
    E: EditorSurface + ?Sized,
{
    match resolved {
        Some(info) => {
            let mode = SyntaxMode::Language(info.mode);
            editor.set_option(EditorOption::Mode(mode.clone()));
            editor.set_option(EditorOption::HtmlMode(info.markup));
            mode
        }
        None => {
            editor.set_option(EditorOption::Mode(SyntaxMode::Plain));
            SyntaxMode::Plain
        }
    }
}

/// Mode lookup backed by syntect's bundled grammars.
///
/// Plain text is reported as "not found" so callers fall back to the plain
/// mode themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntectModeLookup;

impl SyntectModeLookup {
    fn describe(syntax: &SyntaxReference) -> Option<ModeInfo> {
        if syntax.name == SYNTAX_SET.find_syntax_plain_text().name {
            return None;
        }
        let markup = syntax.name.starts_with("HTML") || syntax.name == "XML";
        Some(ModeInfo {
            mode: syntax.name.clone(),
            markup,
        })
    }
}

impl ModeLookup for SyntectModeLookup {
    fn by_extension(&self, extension: &str) -> Option<ModeInfo> {
        if extension.is_empty() {
            return None;
        }
        SYNTAX_SET
            .find_syntax_by_extension(extension)
            .or_else(|| SYNTAX_SET.find_syntax_by_extension(&extension.to_lowercase()))
            .and_then(Self::describe)
    }

    fn by_name(&self, name: &str) -> Option<ModeInfo> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        SYNTAX_SET
            .find_syntax_by_name(name)
            .or_else(|| {
                SYNTAX_SET
                    .syntaxes()
                    .iter()
                    .find(|syntax| syntax.name.eq_ignore_ascii_case(name))
            })
            .and_then(Self::describe)
    }
}
