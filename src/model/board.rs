use super::section::Section;

/// The ordered list of sections. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub sections: Vec<Section>,
}

impl Board {
    pub fn new(sections: Vec<Section>) -> Self {
        Board { sections }
    }

    pub fn find(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn task_count(&self) -> usize {
        self.sections.iter().map(|s| s.tasks.len()).sum()
    }

    pub fn done_count(&self) -> usize {
        self.sections.iter().map(Section::done_count).sum()
    }
}
