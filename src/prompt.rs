use crate::models::RepoRef;

/// The answer the model must give when repository data could not be fetched.
pub const FETCH_ERROR_MESSAGE: &str = "Error: Could not fetch repository data. Please ensure the owner and repository names are correct.";

/// Second-level headings every README must carry, in order. The title and
/// the plain description above them are checked separately.
pub const REQUIRED_SECTIONS: [&str; 6] = [
    "## ✨ Features",
    "## 💻 Tech Stack",
    "## 📂 Project Structure",
    "## 🚀 Getting Started",
    "## Usage",
    "## License",
];

pub const SYSTEM_INSTRUCTION: &str = r#"
# ROLE & GOAL
You are an expert software analyst and technical writer. Your only job is to produce a complete, professional README.md for a public GitHub repository from its metadata and file tree.

# WORKFLOW
1. Your first response MUST call the 'fetchRepo' and 'fetchTree' tools, both at once.
2. Analyze the tool results using the ANALYSIS RULES below.
3. Answer with one complete README.md as a markdown string that follows the REQUIRED STRUCTURE exactly.

# ANALYSIS RULES
* Name & description: use the 'name' and 'description' fields from 'fetchRepo'. If the description is null, write a one-sentence summary inferred from the file names and layout. Never print the word "null".
* Features: infer 2-4 key features from file and directory names (for example 'auth.js' suggests user authentication, '/controllers' suggests an MVC web backend).
* Tech stack: infer languages from file extensions and frameworks or libraries from manifests ('package.json', 'Cargo.toml', 'requirements.txt', 'pom.xml', 'go.mod').
* Installation: derive install commands from the manifests found (for example 'npm install', 'cargo build', 'pip install -r requirements.txt').
* Errors: if a tool result contains an "error" field for the repository metadata, do NOT write a README and do NOT invent data. Output exactly: "Error: Could not fetch repository data. Please ensure the owner and repository names are correct."
* An empty tree is not an error: render the Project Structure section with an empty code block.

# REQUIRED STRUCTURE

## 1. Project Title
- An H1 heading with the repository name.

## 2. Description
- The repository description, or the generated summary.

## 3. Features
- H2 heading '✨ Features' followed by a bulleted list of 2-4 features.

## 4. Tech Stack
- H2 heading '💻 Tech Stack' followed by a bulleted list of languages, frameworks and key libraries.

## 5. Project Structure
- H2 heading '📂 Project Structure' followed by the file tree from 'fetchTree' inside a code block.

## 6. Installation Guide
- H2 heading '🚀 Getting Started' followed by the install commands inside a code block.

## 7. Usage
- H2 heading 'Usage' followed by a placeholder for the author to fill in.

## 8. License
- H2 heading 'License'. Name the license from the metadata (for example "This project is licensed under the MIT License."), or state that the project is unlicensed.

# OUTPUT RULES
* Never skip one of the 8 sections. Use placeholders when nothing can be inferred.
* Output a single clean markdown document and nothing else.
* No conversational text, apologies or preambles such as "Here is the README".
"#;

/// Opening user turn of every run.
pub fn initial_request(repo: &RepoRef) -> String {
    format!("Generate a README for the repository {}.", repo)
}

/// True when the model gave up because repository data was unavailable.
pub fn is_fetch_error(markdown: &str) -> bool {
    markdown.trim() == FETCH_ERROR_MESSAGE
}

/// Required headings absent from `markdown`, plus the title when no H1 exists.
pub fn missing_sections(markdown: &str) -> Vec<&'static str> {
    let headings: Vec<&str> = markdown.lines().map(str::trim_end).collect();

    let mut missing = Vec::new();
    if !headings.iter().any(|line| line.starts_with("# ")) {
        missing.push("# <repository name>");
    }
    missing.extend(
        REQUIRED_SECTIONS
            .iter()
            .copied()
            .filter(|section| !headings.contains(section)),
    );
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_names_both_tools_and_the_error_text() {
        assert!(SYSTEM_INSTRUCTION.contains("'fetchRepo'"));
        assert!(SYSTEM_INSTRUCTION.contains("'fetchTree'"));
        assert!(SYSTEM_INSTRUCTION.contains(FETCH_ERROR_MESSAGE));
    }

    #[test]
    fn instruction_lists_every_section() {
        for section in REQUIRED_SECTIONS {
            let title = section.trim_start_matches("## ");
            assert!(SYSTEM_INSTRUCTION.contains(title), "missing {}", title);
        }
    }

    #[test]
    fn complete_readme_has_no_missing_sections() {
        let mut readme = String::from("# Hello-World\n\nA test.\n\n");
        for section in REQUIRED_SECTIONS {
            readme.push_str(section);
            readme.push_str("\n\ntext\n\n");
        }
        assert!(missing_sections(&readme).is_empty());
    }

    #[test]
    fn reports_missing_title_and_sections() {
        let missing = missing_sections("Some text\n## Usage\n");
        assert!(missing.contains(&"# <repository name>"));
        assert!(missing.contains(&"## License"));
        assert!(!missing.contains(&"## Usage"));
    }

    #[test]
    fn detects_fetch_error_answer() {
        assert!(is_fetch_error(&format!("  {}\n", FETCH_ERROR_MESSAGE)));
        assert!(!is_fetch_error("# Hello-World"));
    }

    #[test]
    fn initial_request_names_the_repository() {
        let repo = RepoRef::new("octocat", "Hello-World");
        assert_eq!(
            initial_request(&repo),
            "Generate a README for the repository octocat/Hello-World."
        );
    }
}
