// zoom.rs — discrete field-of-view zoom

use crate::panorama::{ViewerState, FOV_STEP, MAX_FOV, MIN_FOV};
use crate::scene::SceneCommand;

// The FOV is pushed even when the bound swallowed the step, so the camera
// always mirrors the state.

pub fn zoom_in(state: &mut ViewerState) -> Vec<SceneCommand> {
    state.field_of_view = state.field_of_view.saturating_sub(FOV_STEP).max(MIN_FOV);
    vec![SceneCommand::SetFieldOfView(state.field_of_view)]
}

pub fn zoom_out(state: &mut ViewerState) -> Vec<SceneCommand> {
    state.field_of_view = (state.field_of_view + FOV_STEP).min(MAX_FOV);
    vec![SceneCommand::SetFieldOfView(state.field_of_view)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ImageId;

    #[test]
    fn zoom_in_is_idempotent_at_lower_bound() {
        let mut s = ViewerState::new(ImageId::from("a.jpg"));
        for _ in 0..20 {
            zoom_in(&mut s);
        }
        assert_eq!(s.field_of_view(), MIN_FOV);
        assert_eq!(zoom_in(&mut s), vec![SceneCommand::SetFieldOfView(30)]);
    }

    #[test]
    fn zoom_out_clamps_at_upper_bound() {
        let mut s = ViewerState::new(ImageId::from("a.jpg"));
        let mut effective = 0;
        for _ in 0..10 {
            let before = s.field_of_view();
            zoom_out(&mut s);
            if s.field_of_view() != before {
                effective += 1;
            }
        }
        assert_eq!(s.field_of_view(), 120);
        assert_eq!(effective, 8);
    }

    #[test]
    fn fov_stays_in_bounds() {
        let mut s = ViewerState::new(ImageId::from("a.jpg"));
        for i in 0u32..100 {
            if (i / 7) % 2 == 0 {
                zoom_in(&mut s);
            } else {
                zoom_out(&mut s);
            }
            assert!((MIN_FOV..=MAX_FOV).contains(&s.field_of_view()));
        }
    }
}
