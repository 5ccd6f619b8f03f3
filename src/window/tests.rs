//! Unit tests for the window set

use super::*;

#[test]
fn test_add_and_remove_view() {
    let mut wm = WindowManager::new();
    let a = wm.add_view("a", Rectangle::new(0, 0, 100, 100));
    let b = wm.add_view("b", Rectangle::new(50, 50, 100, 100));
    assert_ne!(a, b);
    assert_eq!(wm.len(), 2);
    assert_eq!(wm.focused_view(), Some(a));

    let removed = wm.remove_view(a).expect("view a exists");
    assert_eq!(removed.title, "a");
    assert!(!wm.contains(a));
    assert_eq!(wm.focused_view(), Some(b));
    assert!(wm.remove_view(a).is_none());
}

#[test]
fn test_view_at_prefers_topmost() {
    let mut wm = WindowManager::new();
    let bottom = wm.add_view("bottom", Rectangle::new(0, 0, 200, 200));
    let top = wm.add_view("top", Rectangle::new(100, 100, 200, 200));

    assert_eq!(wm.view_at(150.0, 150.0), Some(top));
    assert_eq!(wm.view_at(10.0, 10.0), Some(bottom));
    assert_eq!(wm.view_at(500.0, 500.0), None);

    wm.focus_view(bottom).unwrap();
    assert_eq!(wm.view_at(150.0, 150.0), Some(bottom));
    assert_eq!(wm.stacking_order(), vec![top, bottom]);
}

#[test]
fn test_contains_point_excludes_far_edges() {
    let rect = Rectangle::new(10, 10, 100, 50);
    assert!(rect.contains_point(10.0, 10.0));
    assert!(rect.contains_point(109.5, 59.5));
    assert!(!rect.contains_point(110.0, 30.0));
    assert!(!rect.contains_point(30.0, 60.0));
}

#[test]
fn test_resize_view_applies_constraints() {
    let mut wm = WindowManager::new();
    let id = wm.add_view("term", Rectangle::new(0, 0, 400, 300));
    {
        let view = wm.view_mut(id).unwrap();
        view.constraints.min_width = Some(200);
        view.constraints.max_height = Some(250);
    }

    wm.resize_view(id, 50, 1000).unwrap();
    assert_eq!(wm.view(id).unwrap().geometry.size(), (200, 250));
}

#[test]
fn test_immovable_view_rejects_move() {
    let mut wm = WindowManager::new();
    let id = wm.add_view("panel", Rectangle::new(0, 0, 400, 30));
    wm.view_mut(id).unwrap().constraints.movable = false;

    assert_eq!(wm.move_view(id, 5, 5), Err(ViewError::NotMovable(id)));
    assert_eq!(wm.view(id).unwrap().geometry.loc(), (0, 0));
}

#[test]
fn test_missing_view_errors() {
    let mut wm = WindowManager::new();
    let ghost = ViewId(42);
    assert_eq!(
        wm.set_view_geometry(ghost, Rectangle::default()),
        Err(ViewError::NotFound(ghost))
    );
    assert_eq!(wm.focus_view(ghost), Err(ViewError::NotFound(ghost)));
    assert_eq!(ViewError::NotFound(ghost).to_string(), "view#42 not found");
}
