use super::Step;
use crate::descriptor::ProjectDescriptor;
use crate::document::ConfigDocument;
use crate::error::Result;

/// Includes the asset pack module in the Gradle build.
pub struct SettingsStep;
impl Step for SettingsStep {
    fn name(&self) -> &'static str {
        "settings"
    }

    fn apply(&self, mut document: ConfigDocument, descriptor: &ProjectDescriptor) -> Result<ConfigDocument> {
        let pack = descriptor.pack_name();
        let include = format!("include ':{pack}'");
        let project_dir = format!(
            "project(':{pack}').projectDir = new File(rootProject.projectDir, 'app/src/main/assetpacks/{pack}')"
        );
        for line in [include, project_dir] {
            if !document.settings.contains(&line) {
                document.settings.push('\n');
                document.settings.push_str(&line);
            }
        }
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;

    fn apply(settings: &str) -> String {
        let document = ConfigDocument { settings: settings.to_string(), ..fixtures::document() };
        SettingsStep.apply(document, &fixtures::descriptor()).unwrap().settings
    }

    #[test]
    fn appends_both_lines() {
        assert_eq!(
            apply(fixtures::SETTINGS),
            "rootProject.name = 'FBT'\ninclude ':app'\n\ninclude ':fbtvideos'\n\
             project(':fbtvideos').projectDir = new File(rootProject.projectDir, 'app/src/main/assetpacks/fbtvideos')"
        );
    }

    #[test]
    fn lines_appear_once_after_repeated_runs() {
        let settings = apply(&apply(&apply(fixtures::SETTINGS)));
        assert_eq!(settings.matches("include ':fbtvideos'").count(), 1);
        assert_eq!(settings.matches("project(':fbtvideos').projectDir").count(), 1);
    }

    #[test]
    fn only_missing_line_is_added() {
        let settings = apply("include ':fbtvideos'");
        assert!(settings.starts_with("include ':fbtvideos'\nproject(':fbtvideos')"));
        assert_eq!(settings.matches("include ':fbtvideos'").count(), 1);
    }
}
