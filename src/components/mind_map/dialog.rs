use super::types::NodeId;

/// Transient form state of the "Add New Node" dialog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DialogState {
	pub selected_parent_id: Option<NodeId>,
	pub title_input: String,
	pub content_input: String,
	pub is_open: bool,
}

impl DialogState {
	/// Open for `parent` with every field cleared.
	pub fn open_for(&mut self, parent: &str) {
		*self = Self {
			selected_parent_id: Some(parent.to_string()),
			is_open: true,
			..Self::default()
		};
	}

	pub fn close(&mut self) {
		*self = Self::default();
	}

	/// The create control is enabled only for a non-blank title.
	pub fn can_submit(&self) -> bool {
		self.is_open && !self.title_input.trim().is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reopening_clears_previous_input() {
		let mut dialog = DialogState::default();
		dialog.open_for("1");
		dialog.title_input = "Draft".into();
		dialog.content_input = "Notes".into();
		dialog.open_for("1-1");
		assert_eq!(dialog.selected_parent_id.as_deref(), Some("1-1"));
		assert!(dialog.title_input.is_empty());
		assert!(dialog.content_input.is_empty());
		assert!(dialog.is_open);
	}

	#[test]
	fn whitespace_title_cannot_submit() {
		let mut dialog = DialogState::default();
		dialog.open_for("1");
		dialog.title_input = " \t ".into();
		assert!(!dialog.can_submit());
		dialog.title_input = " x ".into();
		assert!(dialog.can_submit());
	}
}
