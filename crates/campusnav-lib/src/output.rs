use std::fmt::Write;

use crate::routing::RoutePlan;

impl RoutePlan {
    /// Render the plan as plain text, one block per floor followed by the
    /// numbered instructions.
    pub fn render_text(&self) -> String {
        let mut buffer = String::new();
        if !self.is_found() {
            buffer.push_str("No route found\n");
            return buffer;
        }

        let _ = writeln!(
            buffer,
            "Route weight {:.2} across {} floor group(s):",
            self.weight,
            self.path.len()
        );
        for group in &self.path {
            let _ = writeln!(buffer, "Floor {}:", group.floor);
            for point in &group.points {
                let _ = writeln!(
                    buffer,
                    "  - {} ({:.2}, {:.2})",
                    point.vertex, point.x, point.y
                );
            }
        }

        if !self.instructions.is_empty() {
            buffer.push_str("Instructions:\n");
            for (index, instruction) in self.instructions.iter().enumerate() {
                let _ = writeln!(buffer, "  {:>2}. {}", index + 1, instruction);
            }
        }
        buffer
    }
}
