use smartglue_macros::ParameterSet;

#[derive(Debug, ParameterSet)]
struct Soil {
    depth: f64,
    #[parameter(name = "C")]
    decay: f64,
    outflow: f64,
}

fn main() {
    assert_eq!(Soil::NAMES, &["depth", "C", "outflow"]);
    let err = Soil::from_slice(&[1.0, 2.0]).unwrap_err();
    assert_eq!(err, "expected 3 parameters, got 2");
    assert!(Soil::from_slice(&[1.0, 2.0, 3.0, 4.0]).is_err());
    let soil = Soil::from_slice(&[60.0, 0.5, 0.01]).unwrap();
    assert_eq!(soil.decay, 0.5);
}
