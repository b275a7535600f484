/// Section headers that a well-formed memory document must contain.
///
/// Presence is advisory only: `MemoryStore::stats` reports it, nothing
/// blocks on it.
pub const REQUIRED_SECTIONS: &[&str] = &[
    "USER PROFILE",
    "COMMUNICATION STYLE:",
    "INTERESTS:",
    "PREFERENCES:",
    "CONTEXT:",
];

/// Document written when no memory file has ever been persisted.
pub const DEFAULT_MEMORY_TEMPLATE: &str = "\
USER PROFILE
===========

COMMUNICATION STYLE:
- [To be determined from conversations]

INTERESTS:
- [To be determined from conversations]

PREFERENCES:
- [To be determined from conversations]

CONTEXT:
- [To be determined from conversations]

TECHNICAL BACKGROUND:
- [To be determined from conversations]

RESPONSE FORMAT PREFERENCES:
- [To be determined from conversations]
";

/// Prompt key the processing pipeline looks up in the prompts file.
pub const AUGMENT_MEMORY_PROMPT: &str = "augment-memory";

/// Starter prompts file written by `mnemo init` when none exists.
pub const STARTER_PROMPTS_TOML: &str = r#"# Prompt templates for mnemo. `{{LOGS}}` and `{{MEMORY}}` are substituted
# before dispatch.

augment-memory = """
You maintain a long-lived profile document about a user, assembled from
their chat history. Review the conversations below and propose precise
amendments to the current document.

Current document:
{{MEMORY}}

Recent conversations:
{{LOGS}}

Propose each change as a literal search/replace block, exactly:

<<<<<<< SEARCH
text currently in the document, verbatim
=======
replacement text
>>>>>>> REPLACE

The SEARCH text must appear verbatim in the document. Propose no blocks
if the conversations reveal nothing new.
"""
"#;
