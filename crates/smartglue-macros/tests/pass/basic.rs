use smartglue_macros::ParameterSet;

#[derive(Debug, Clone, Copy, ParameterSet)]
pub struct Reservoir {
    pub capacity: f64,
    pub recession: f64,
}

fn main() {
    assert_eq!(Reservoir::NAMES, &["capacity", "recession"]);
    assert_eq!(Reservoir::COUNT, 2);
    let r = Reservoir::from_slice(&[150.0, 0.2]).unwrap();
    assert_eq!(r.capacity, 150.0);
    assert_eq!(r.to_array(), [150.0, 0.2]);
    assert!(Reservoir::from_slice(&[1.0]).is_err());
}
