//! Plain-text prompt sheet: every shot's generation prompts in one block,
//! ready to paste into external image/video tools.

use crate::project::model::Project;

/// Renders the project's prompts as a numbered text digest.
pub fn export_prompt_sheet(project: &Project) -> String {
    project
        .shots
        .iter()
        .map(|s| {
            format!(
                "[Shot {}]\nT2I: {}\nI2V: {}\n",
                s.shot_number, s.t2i_prompt, s.i2v_prompt
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::model::Shot;

    #[test]
    fn test_prompt_sheet_lists_every_shot() {
        let mut project = Project::new("p-1");
        let mut a = Shot::new("a", 1);
        a.t2i_prompt = "alley, neon rain".to_string();
        a.i2v_prompt = "slow push in".to_string();
        let mut b = Shot::new("b", 2);
        b.t2i_prompt = "rooftop, dawn haze".to_string();
        project.shots = vec![a, b];

        let sheet = export_prompt_sheet(&project);
        assert!(sheet.contains("[Shot 1]\nT2I: alley, neon rain\nI2V: slow push in"));
        assert!(sheet.contains("[Shot 2]\nT2I: rooftop, dawn haze"));
    }
}
