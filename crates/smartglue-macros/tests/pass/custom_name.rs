use smartglue_macros::ParameterSet;

#[derive(Debug, Clone, Copy, ParameterSet)]
pub struct Routing {
    #[parameter(name = "SK")]
    pub surface_k: f64,
    #[parameter(name = "GK")]
    pub groundwater_k: f64,
    pub lag: f64,
}

fn main() {
    assert_eq!(Routing::NAMES, &["SK", "GK", "lag"]);
    let r = Routing::from_slice(&[10.0, 2000.0, 1.0]).unwrap();
    assert_eq!(r.groundwater_k, 2000.0);
    assert_eq!(r.to_array().len(), Routing::COUNT);
}
