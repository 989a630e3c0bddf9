//! The curated term vocabulary. Index order is part of the embedding
//! contract: reordering or editing this list is a breaking embedding change.

/// Technical terms occupying the first `VOCABULARY.len()` vector dimensions,
/// by index.
pub(crate) const VOCABULARY: &[&str] = &[
    // Languages
    "rust", "python", "javascript", "typescript", "java", "kotlin", "swift", "golang",
    "ruby", "php", "scala", "haskell", "elixir", "clojure", "erlang", "lua",
    "perl", "bash", "sql", "html", "css", "wasm", "zig", "dart",
    // Frameworks and runtimes
    "react", "vue", "angular", "svelte", "nextjs", "nuxt", "django", "flask",
    "fastapi", "rails", "laravel", "spring", "express", "axum", "actix", "rocket",
    "tokio", "tauri", "electron", "flutter", "node", "deno", "bun", "rayon",
    // Databases and messaging
    "postgresql", "postgres", "mysql", "sqlite", "mongodb", "redis", "cassandra", "dynamodb",
    "elasticsearch", "clickhouse", "duckdb", "mariadb", "memcached", "kafka", "rabbitmq", "nats",
    // Cloud and infrastructure
    "docker", "kubernetes", "terraform", "ansible", "jenkins", "github", "gitlab", "bitbucket",
    "aws", "azure", "gcp", "lambda", "heroku", "vercel", "netlify", "cloudflare",
    "nginx", "apache", "linux", "ubuntu", "debian", "alpine", "windows", "macos",
    // Protocols and security
    "api", "rest", "graphql", "grpc", "http", "https", "tcp", "udp",
    "websocket", "oauth", "jwt", "saml", "ssl", "tls", "authentication", "authorization",
    "encryption", "hashing", "certificate", "credential", "password", "apikey", "secret", "token",
    // Architecture
    "caching", "queue", "worker", "cron", "webhook", "microservice", "monolith", "serverless",
    "container", "deployment", "migration", "schema", "index", "transaction", "replication", "sharding",
    "backup", "logging", "metrics", "tracing", "monitoring", "alerting", "observability", "scaling",
    // Engineering practice
    "testing", "debugging", "refactoring", "linting", "formatting", "review", "benchmark", "profiling",
    "compiler", "interpreter", "runtime", "memory", "thread", "process", "async", "await",
    "mutex", "channel", "socket", "buffer", "stream", "parser", "lexer", "syntax",
    // Machine learning
    "embedding", "vector", "model", "inference", "training", "dataset", "pipeline", "etl",
    "batch", "realtime", "tokenizer", "transformer", "llm", "prompt", "agent", "retrieval",
    // Tools
    "git", "vim", "emacs", "vscode", "intellij", "npm", "yarn", "pnpm",
    "cargo", "pip", "poetry", "maven", "gradle", "make", "cmake", "bazel",
    "webpack", "vite", "babel", "eslint", "prettier", "pytest", "jest", "mocha",
    "cypress", "selenium", "playwright", "clippy", "rustfmt", "valgrind", "gdb", "lldb",
    // Data formats
    "json", "yaml", "toml", "xml", "csv", "protobuf", "avro", "parquet",
    "markdown", "binary", "utf8", "base64", "gzip", "zstd", "checksum", "sha256",
    // Project vocabulary
    "frontend", "backend", "fullstack", "database", "server", "client", "browser", "mobile",
    "desktop", "cli", "gui", "sdk", "ide", "repo", "branch", "commit",
    "merge", "rebase", "release", "version", "semver", "dependency", "package", "module",
    "library", "framework", "plugin", "extension", "config", "environment", "variable", "convention",
];

/// Down-weighted conversational filler.
pub(crate) const COMMON_WORDS: &[&str] = &[
    "the", "and", "for", "that", "this", "with", "from", "have",
    "will", "would", "should", "could", "about", "into", "over", "then",
    "them", "they", "there", "their", "been", "being", "what", "when",
    "where", "which", "while", "your", "just", "like", "also", "because",
    "some", "more", "most", "other", "such", "only", "very", "after",
    "before", "between", "through", "during", "does", "done", "using", "used",
];
