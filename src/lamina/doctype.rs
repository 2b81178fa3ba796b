//! Doctype declarations
//!
//! Fixed mapping from the doctype literal to a complete `<!DOCTYPE …>`
//! declaration. A bare `!!!` selects XHTML 1.0 Transitional; anything
//! outside the table is a compile error.

/// Declaration selected by a bare `!!!` line.
pub const DEFAULT: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">";

/// Resolve a doctype literal to its declaration, `None` for literals
/// outside the table.
pub fn declaration(literal: &str) -> Option<&'static str> {
    match literal {
        "Strict" => Some("<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">"),
        "Frameset" => Some("<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Frameset//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-frameset.dtd\">"),
        "5" => Some("<!DOCTYPE html>"),
        "1.1" => Some("<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.1//EN\" \"http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd\">"),
        "Basic" => Some("<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML Basic 1.1//EN\" \"http://www.w3.org/TR/xhtml-basic/xhtml-basic11.dtd\">"),
        "Mobile" => Some("<!DOCTYPE html PUBLIC \"-//WAPFORUM//DTD XHTML Mobile 1.2//EN\" \"http://www.openmobilealliance.org/tech/DTD/xhtml-mobile12.dtd\">"),
        "RDFa" => Some("<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML+RDFa 1.0//EN\" \"http://www.w3.org/MarkUp/DTD/xhtml-rdfa-1.dtd\">"),
        _ => None,
    }
}
