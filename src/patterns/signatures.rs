//! Compiled detection patterns
//!
//! Built once per process and shared read-only. Classifiers receive a
//! `&Signatures` so tests can exercise them against the same tables.

use once_cell::sync::Lazy;
use regex::Regex;

const DIRECTORY_LISTING: &[&str] = &[
    r"(?i)<title>.*index of.*</title>",
    r"(?i)<h1>index of",
    r"(?i)directory listing for",
    r#"(?i)<pre><a href="\.\./""#,
    r"(?i)parent directory</a>",
    r#"(?i)<th><a href="\?C=N;O=D">name</a></th>"#,
];

const LOGIN_FORM: &[&str] = &[
    r#"(?i)<input[^>]*type\s*=\s*["']?password"#,
    r"(?i)<input[^>]*name[^>]*password[^>]*>",
    r"(?is)<input[^>]*name[^>]*(?:username|user|email)[^>]*>.*<input[^>]*type[^>]*password[^>]*>",
];

const DEFAULT_INSTALLATION: &[&str] = &[
    r"(?i)welcome to.*installation",
    r"(?i)default.*installation.*page",
    r"(?i)congratulations.*successfully installed",
    r"(?i)apache.*test page",
    r"(?i)welcome to nginx",
    r"(?i)nginx.*welcome",
    r"(?i)iis.*welcome",
    r"(?i)xampp.*dashboard",
    r"(?i)wamp.*server",
];

const INFORMATION_LEAKAGE: &[&str] = &[
    r"(?i)stack trace|stacktrace",
    r"(?i)exception|error.*line \d+",
    r"(?i)mysql.*error|postgresql.*error|oracle.*error",
    r"(?i)warning.*include.*failed to open stream",
    r"(?i)fatal error.*in.*on line \d+",
    r"(?i)debug.*information|debug.*mode",
    r"(?i)internal server error.*details",
    r"(?i)application.*error.*details",
    r"(?i)file not found.*path.*[/\\]",
    r"(?i)access denied.*path.*[/\\]",
];

const SQL_ERRORS: &[&str] = &[
    r"(?i)mysql_fetch_array|mysql_num_rows|mysql_error|you have an error in your sql syntax",
    r"(?i)postgresql|pg_query|pg_exec|syntax error at or near",
    r"(?i)microsoft ole db|sqlserver|syntax error|unclosed quotation mark",
    r"(?i)ora-\d+|oracle error|ociexecute|ocifetchstatement",
    r"(?i)sqlite_exec|sqlite error|syntax error near",
    r"(?i)sql syntax|database error|db error|query failed|invalid query",
];

const NOSQL_ERRORS: &[&str] = &[
    r"(?i)mongodb|mongo|bson error",
    r"(?i)couchdb|couch error",
    r"(?i)invalid json|json parse error",
];

/// (software, pattern) pairs; the first capture group is the version
const VERSION_DISCLOSURE: &[(&str, &str)] = &[
    ("Apache", r"(?i)apache/(\d+\.\d+\.\d+)"),
    ("nginx", r"(?i)nginx/(\d+\.\d+\.\d+)"),
    ("Microsoft-IIS", r"(?i)microsoft-iis/(\d+\.\d+)"),
    ("PHP", r"(?i)php/(\d+\.\d+\.\d+)"),
    ("MySQL", r"(?i)mysql[^\d\n]{0,40}(\d+\.\d+\.\d+)"),
    ("PostgreSQL", r"(?i)postgresql[^\d\n]{0,40}(\d+\.\d+\.\d+)"),
    ("WordPress", r"(?i)wordpress[^\d\n]{0,40}(\d+\.\d+\.\d+)"),
    ("Drupal", r"(?i)drupal[^\d\n]{0,40}(\d+\.\d+\.\d+)"),
    ("Joomla", r"(?i)joomla[^\d\n]{0,40}(\d+\.\d+\.\d+)"),
];

/// A software version found in a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMatch {
    pub software: &'static str,
    pub version: String,
    /// The matched text, verbatim
    pub matched: String,
}

/// All compiled detection tables
pub struct Signatures {
    directory_listing: Vec<Regex>,
    login_form: Vec<Regex>,
    default_installation: Vec<Regex>,
    information_leakage: Vec<Regex>,
    sql_errors: Vec<Regex>,
    nosql_errors: Vec<Regex>,
    versions: Vec<(&'static str, Regex)>,
}

static SIGNATURES: Lazy<Signatures> = Lazy::new(Signatures::compile);

impl Signatures {
    /// The process-wide tables
    pub fn global() -> &'static Signatures {
        &SIGNATURES
    }

    fn compile() -> Self {
        Self {
            directory_listing: compile_all(DIRECTORY_LISTING),
            login_form: compile_all(LOGIN_FORM),
            default_installation: compile_all(DEFAULT_INSTALLATION),
            information_leakage: compile_all(INFORMATION_LEAKAGE),
            sql_errors: compile_all(SQL_ERRORS),
            nosql_errors: compile_all(NOSQL_ERRORS),
            versions: VERSION_DISCLOSURE
                .iter()
                .map(|(software, pattern)| (*software, compile(pattern)))
                .collect(),
        }
    }

    pub fn is_directory_listing(&self, body: &str) -> bool {
        matches_any(&self.directory_listing, body)
    }

    pub fn has_login_form(&self, body: &str) -> bool {
        matches_any(&self.login_form, body)
    }

    pub fn is_default_installation(&self, body: &str) -> bool {
        matches_any(&self.default_installation, body)
    }

    pub fn leaks_information(&self, body: &str) -> bool {
        matches_any(&self.information_leakage, body)
    }

    pub fn has_sql_error(&self, body: &str) -> bool {
        matches_any(&self.sql_errors, body)
    }

    pub fn has_nosql_error(&self, body: &str) -> bool {
        matches_any(&self.nosql_errors, body)
    }

    /// First software version disclosed in `text`, in table order
    pub fn detect_version(&self, text: &str) -> Option<VersionMatch> {
        self.versions.iter().find_map(|(software, re)| {
            let caps = re.captures(text)?;
            Some(VersionMatch {
                software,
                version: caps.get(1)?.as_str().to_string(),
                matched: caps.get(0)?.as_str().to_string(),
            })
        })
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in detection pattern must compile")
}

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| compile(p)).collect()
}

fn matches_any(patterns: &[Regex], body: &str) -> bool {
    !body.is_empty() && patterns.iter().any(|re| re.is_match(body))
}
