pub mod configuration;

pub mod batch {
    pub mod batchrequest;
    pub mod batchevaluator;
}

pub mod estimation {
    pub mod criticalvalue;
    pub mod diagnostics;
    pub mod queryresult;
    pub mod intervalestimator;
}

pub mod math {
    pub mod curve {
        pub mod curve;
    }
    pub mod round;
}

pub mod objectwithuuid;

pub mod regression {
    pub mod fiterror;
    pub mod polynomialmodel;
    pub mod curvefitter;
}

pub mod report {
    pub mod forecastreport;
}

pub mod series {
    pub mod observation;
    pub mod series;
    pub mod seriessource;
    pub mod worldbank;
    pub mod csvseries;
    pub mod seriescache;
}
