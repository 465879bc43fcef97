use derive_builder::Builder;

use crate::policy::{Policy, ReleaseNotePolicy, TextRule, ValidationPolicy};

#[derive(Builder)]
#[builder(pattern = "owned", name = "TestPolicy")]
pub struct PolicyTemplate {
    #[builder(default)]
    validation_disabled: bool,
    #[builder(default = "vec![\"*\"]", setter(into))]
    validate_branches: Vec<&'static str>,
    #[builder(default, setter(into))]
    title_prefixes: Vec<&'static str>,
    #[builder(default, setter(strip_option))]
    description_min_length: Option<usize>,
    #[builder(default)]
    release_note_disabled: bool,
    #[builder(default, setter(into))]
    release_branches: Vec<&'static str>,
    #[builder(default, setter(into))]
    tags: Vec<&'static str>,
    #[builder(default)]
    draft: bool,
    #[builder(default = "true")]
    notify: bool,
}

fn strings(values: Vec<&str>) -> Vec<String> {
    values.into_iter().map(str::to_string).collect()
}

impl TestPolicy {
    pub fn create(self) -> Policy {
        let PolicyTemplate {
            validation_disabled,
            validate_branches,
            title_prefixes,
            description_min_length,
            release_note_disabled,
            release_branches,
            tags,
            draft,
            notify,
        } = self.build().unwrap();
        Policy {
            version: 1,
            validation: ValidationPolicy {
                disable: validation_disabled,
                branches: strings(validate_branches),
                title: TextRule {
                    prefixes: strings(title_prefixes),
                    ..TextRule::default()
                },
                description: TextRule {
                    min_length: description_min_length,
                    ..TextRule::default()
                },
            },
            release_note: ReleaseNotePolicy {
                disable: release_note_disabled,
                branches: strings(release_branches),
                tags: strings(tags),
                draft,
                notify,
            },
        }
    }
}
