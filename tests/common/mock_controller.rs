//! Mock Document Controller for Testing
//!
//! Records every command chain it is asked to run.

use std::sync::{Arc, Mutex};

use richedit::engine::{
    ActiveQuery, Command, Coords, DocumentController, DocumentNode, EngineEvent, ImageAttrs,
    NodeInfo, NodeType, Selection,
};
use richedit::error::CommandError;

/// Mock engine over a flat string; positions are char offsets into `text`
#[derive(Debug)]
pub struct MockController {
    /// Every committed chain, commands rendered with `Display`
    pub runs: Arc<Mutex<Vec<Vec<String>>>>,
    /// Refuse the next chains
    pub should_fail: Arc<Mutex<bool>>,
    pub text: String,
    pub selection: Selection,
    pub active: Vec<ActiveQuery>,
    /// Image node reported by `node_at` for any position
    pub image: Option<(usize, ImageAttrs)>,
}

impl MockController {
    pub fn new(text: &str) -> Self {
        Self {
            runs: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
            text: text.to_string(),
            selection: Selection::cursor(text.chars().count()),
            active: Vec::new(),
            image: None,
        }
    }

    pub fn with_image(mut self, pos: usize, attrs: ImageAttrs) -> Self {
        self.image = Some((pos, attrs));
        self
    }

    pub fn fail(&self, fail: bool) {
        *self.should_fail.lock().unwrap() = fail;
    }

    /// All chains that were committed
    pub fn get_runs(&self) -> Vec<Vec<String>> {
        self.runs.lock().unwrap().clone()
    }

    /// Flattened list of committed commands
    pub fn commands(&self) -> Vec<String> {
        self.get_runs().into_iter().flatten().collect()
    }
}

impl DocumentController for MockController {
    fn html(&self) -> String {
        format!("<p>{}</p>", self.text)
    }

    fn json(&self) -> DocumentNode {
        DocumentNode::new("doc").with_content(vec![DocumentNode::new("paragraph")
            .with_content(vec![DocumentNode::text_node(&self.text, vec![])])])
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn size(&self) -> usize {
        self.text.chars().count()
    }

    fn text_between(&self, from: usize, to: usize) -> String {
        self.text
            .chars()
            .skip(from)
            .take(to.saturating_sub(from))
            .collect()
    }

    fn coords_at_pos(&self, pos: usize) -> Coords {
        Coords {
            left: pos as f32 * 10.0,
            top: 100.0,
            bottom: 120.0,
        }
    }

    fn node_at(&self, _pos: usize) -> Option<NodeInfo> {
        self.image.as_ref().map(|(pos, attrs)| NodeInfo {
            node_type: NodeType::Image,
            pos: *pos,
            image: Some(attrs.clone()),
        })
    }

    fn is_active(&self, query: ActiveQuery) -> bool {
        self.active.contains(&query)
    }

    fn can(&self, _commands: &[Command]) -> bool {
        !*self.should_fail.lock().unwrap()
    }

    fn run(&mut self, commands: &[Command]) -> Result<(), CommandError> {
        if *self.should_fail.lock().unwrap() {
            return Err(CommandError::NotApplicable("mock refusal".into()));
        }
        for command in commands {
            if let Command::DeleteRange { from, to } = command {
                let kept: String = self
                    .text
                    .chars()
                    .enumerate()
                    .filter(|(i, _)| i < from || i >= to)
                    .map(|(_, c)| c)
                    .collect();
                self.text = kept;
                self.selection = Selection::cursor(*from);
            }
        }
        self.runs
            .lock()
            .unwrap()
            .push(commands.iter().map(|c| c.to_string()).collect());
        Ok(())
    }

    fn take_events(&mut self) -> Vec<EngineEvent> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_chains() {
        let mut mock = MockController::new("ab/");
        mock.run(&[Command::DeleteRange { from: 2, to: 3 }]).unwrap();
        assert_eq!(mock.text, "ab");
        assert_eq!(mock.get_runs(), vec![vec!["deleteRange(2..3)".to_string()]]);
    }

    #[test]
    fn test_mock_failure() {
        let mut mock = MockController::new("");
        mock.fail(true);
        assert!(mock.run(&[Command::SetParagraph]).is_err());
        assert!(mock.get_runs().is_empty());
    }
}
