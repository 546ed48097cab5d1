//! Scaffold a config file and sample snippets.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Sample snippets written into `snippets/`, one per common framework.
const SAMPLES: &[(&str, &str)] = &[
    ("index.html", SAMPLE_VANILLA),
    ("counter.jsx", SAMPLE_REACT),
    ("todo.vue", SAMPLE_VUE),
    ("dropdown.html", SAMPLE_ALPINE),
];

/// Run the init command.
///
/// Files are created next to the config file. Existing files are kept unless
/// `yes` is set.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing livepane...");

    let root = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    write_file(config_path, DEFAULT_CONFIG, yes)?;

    let snippets_dir = root.join("snippets");
    if !snippets_dir.exists() {
        fs::create_dir_all(&snippets_dir).context("Failed to create snippets directory")?;
    }

    for (name, content) in SAMPLES {
        write_file(&snippets_dir.join(name), content, yes)?;
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'livepane dev' to start the preview server.");

    Ok(())
}

fn write_file(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());
    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Livepane Configuration

[preview]
# Snippet shown by 'livepane dev'
entry = "snippets/index.html"

# Server port
port = 7777

# Open the browser on start
open = true

# Quiet period before a change triggers a re-render
debounce_ms = 300

# Extra sandbox permissions for the preview frame
allow_forms = false
allow_popups = false

[publish]
# Directory scanned for snippets
source = "snippets"

# Output directory
output = "dist"

# Base URL (for deployment)
base_url = "/"

# Index page title
title = "Previews"

# Minify CSS
minify = true
"#;

const SAMPLE_VANILLA: &str = r#"<h1>Hello from livepane</h1>
<p id="clock"></p>
<script>
  document.getElementById('clock').textContent = new Date().toLocaleTimeString();
</script>
"#;

const SAMPLE_REACT: &str = r#"function Counter() {
  const [count, setCount] = React.useState(0);
  return (
    <button onClick={() => setCount(count + 1)}>
      Clicked {count} times
    </button>
  );
}

const App = () => <Counter />;
"#;

const SAMPLE_VUE: &str = r#"<template>
  <div>
    <input v-model="draft" placeholder="New todo" />
    <button v-on:click="add">Add</button>
    <ul>
      <li v-for="item in items" :key="item">{{ item }}</li>
    </ul>
  </div>
</template>

<script>
export default {
  data() {
    return { draft: '', items: ['Write a snippet'] };
  },
  methods: {
    add() {
      if (this.draft) {
        this.items.push(this.draft);
        this.draft = '';
      }
    }
  }
};
</script>
"#;

const SAMPLE_ALPINE: &str = r#"<div x-data="{ open: false }">
  <button x-on:click="open = !open">Toggle menu</button>
  <ul x-show="open">
    <li>Profile</li>
    <li>Settings</li>
  </ul>
</div>
"#;
