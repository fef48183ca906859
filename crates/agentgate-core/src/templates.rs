//! Issue and comment bodies posted to the hosting platform.

use crate::agent::{AgentKind, PlatformScope};

/// Label color used when a missing label has to be created.
pub const DEFAULT_LABEL_COLOR: &str = "0366d6";

/// Test requirements appended to every agent issue.
pub const TEST_REQUIREMENTS: &str = r#"
## Test Requirements (MANDATORY)

All changes **must** pass these tests before the PR can be merged:

### iOS Snapshot Tests
```bash
cd ios && xcodebuild test \
  -scheme AdaptiveCards-Package \
  -sdk iphonesimulator \
  -destination 'platform=iOS Simulator,name=iPhone 16e' \
  -only-testing:VisualTests/CardElementSnapshotTests \
  CODE_SIGN_IDENTITY=- CODE_SIGNING_REQUIRED=NO CODE_SIGNING_ALLOWED=NO
```
**Expected**: 10/10 tests pass, all baselines match within tolerance.

### iOS Unit Tests
```bash
cd ios && swift test
```

### Android Unit Tests
```bash
cd android && ./gradlew test
```

### Critical Build Flags (iOS)
You **MUST** include these flags for Xcode 26 SPM test targets:
- `CODE_SIGN_IDENTITY=-`
- `CODE_SIGNING_REQUIRED=NO`
- `CODE_SIGNING_ALLOWED=NO`

Without these, the test bundle will fail with "bundle format unrecognized".

### Snapshot Rendering Rules
- Do NOT use `ScrollView` or `LazyVStack` in `PreParsedCardView`, they defeat `layer.render` snapshot capture
- Do NOT use `@StateObject` in snapshot views, SwiftUI lifecycle doesn't fire during `layer.render`
- Use `VStack` with synchronous `CardViewModel` property assignment
- `drawHierarchy` returns `false` in SPM XCTest; the `layer.render` fallback works

### Baseline Recording
If you modify rendering code, re-record baselines:
1. `touch ios/Tests/VisualTests/Snapshots/.record`
2. Run the snapshot tests (they'll record new baselines)
3. `rm ios/Tests/VisualTests/Snapshots/.record`
4. Run again to verify (compare mode)
5. Commit the updated `.png` baselines
"#;

/// Fixed body posted on pull requests whose checks are failing.
pub const ENFORCEMENT_COMMENT: &str = r#"## ⚠️ Test Requirements Not Met

This PR must pass the following tests before it can be merged:

### iOS Snapshot Tests (Required)
```bash
cd ios && xcodebuild test \
  -scheme AdaptiveCards-Package \
  -sdk iphonesimulator \
  -destination 'platform=iOS Simulator,name=iPhone 16e' \
  -only-testing:VisualTests/CardElementSnapshotTests \
  CODE_SIGN_IDENTITY=- CODE_SIGNING_REQUIRED=NO CODE_SIGNING_ALLOWED=NO
```
All 10 tests must pass. If you changed rendering code, re-record baselines first.

### iOS Unit Tests (Required)
```bash
cd ios && swift test
```

### Android Unit Tests (Required)
```bash
cd android && ./gradlew test
```

### Key Constraints
- **Do NOT use ScrollView/LazyVStack** in PreParsedCardView (breaks snapshot capture)
- **Do NOT use @StateObject** in snapshot views (SwiftUI lifecycle unavailable)
- **MUST include CodeSign flags** for Xcode 26: `CODE_SIGN_IDENTITY=- CODE_SIGNING_REQUIRED=NO CODE_SIGNING_ALLOWED=NO`

Please fix and push again. I'll re-check when you update.
"#;

/// Enforcement comment body.
pub fn enforcement_comment() -> &'static str {
    ENFORCEMENT_COMMENT
}

/// Everything needed to file one agent issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    pub agent: AgentKind,
    pub title: String,
    pub body: String,
    pub platform: Option<PlatformScope>,
    pub acceptance: Vec<String>,
    pub extra_labels: Vec<String>,
}

impl IssueDraft {
    pub fn new(agent: AgentKind, title: impl Into<String>) -> Self {
        Self {
            agent,
            title: title.into(),
            body: String::new(),
            platform: None,
            acceptance: Vec::new(),
            extra_labels: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_platform(mut self, platform: Option<PlatformScope>) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_acceptance(mut self, criteria: Vec<String>) -> Self {
        self.acceptance = criteria;
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.extra_labels = labels;
        self
    }

    /// Full issue body: user text, platform scope, acceptance checklist,
    /// test requirements and the agent mention.
    pub fn render_body(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if !self.body.is_empty() {
            parts.push(self.body.clone());
        }

        if let Some(platform) = self.platform {
            parts.push(format!(
                "\n## Platform Scope\n- **Target**: {}",
                platform.label()
            ));
        }

        if !self.acceptance.is_empty() {
            let criteria = self
                .acceptance
                .iter()
                .map(|c| format!("- [ ] {}", c))
                .collect::<Vec<_>>()
                .join("\n");
            parts.push(format!("\n## Acceptance Criteria\n{}", criteria));
        }

        parts.push(TEST_REQUIREMENTS.to_string());
        parts.push(format!(
            "\n---\n{} Please implement this.",
            self.agent.profile().mention
        ));

        parts.join("\n")
    }

    /// Agent label, platform label, then extra labels; first occurrence wins.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = vec![self.agent.profile().label.to_string()];
        if let Some(platform) = self.platform {
            labels.push(platform.label().to_string());
        }
        labels.extend(self.extra_labels.iter().cloned());

        let mut seen = std::collections::HashSet::new();
        labels.retain(|l| seen.insert(l.clone()));
        labels
    }
}

/// Truncate a body for dry-run previews without splitting a character.
pub fn preview(body: &str, max_chars: usize) -> String {
    if body.chars().count() <= max_chars {
        body.to_string()
    } else {
        let head: String = body.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
