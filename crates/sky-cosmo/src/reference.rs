//! Reference comoving distances for a battery of FLRW cosmologies.
//!
//! The values are internal consistency checks rather than results from an
//! external code: they pin down what a distance calculator produced when the
//! table was recorded, so any later drift shows up as a regression. Each
//! family is sampled three ways: no relativistic species, relativistic
//! species with massless neutrinos, and massive neutrinos.

use serde::{Deserialize, Serialize};

use crate::params::{CosmologyParams, DarkEnergy};

/// Redshifts at which every reference case is evaluated.
pub const REFERENCE_REDSHIFTS: [f64; 4] = [1.0, 2.0, 3.0, 4.0];

/// Relative tolerance the reference values were recorded for.
pub const REFERENCE_RTOL: f64 = 1e-4;

/// One named cosmology with its expected comoving distances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCase {
    /// Stable label, `<family>/<variant>`.
    pub label: String,
    /// Cosmology handed to the calculator.
    pub params: CosmologyParams,
    /// Redshifts to evaluate.
    pub redshifts: Vec<f64>,
    /// Expected comoving distances in Mpc, one per redshift.
    pub expected_mpc: Vec<f64>,
}

impl ReferenceCase {
    fn new(variant: &str, params: CosmologyParams, expected_mpc: [f64; 4]) -> Self {
        Self {
            label: format!("{}/{variant}", params.family_name()),
            params,
            redshifts: REFERENCE_REDSHIFTS.to_vec(),
            expected_mpc: expected_mpc.to_vec(),
        }
    }
}

fn massless(params: CosmologyParams) -> CosmologyParams {
    params.with_tcmb0(3.0).with_neff(3.0).with_m_nu(vec![0.0])
}

fn massive(params: CosmologyParams, neff: f64, mass: f64) -> CosmologyParams {
    params.with_tcmb0(3.0).with_neff(neff).with_m_nu(vec![mass])
}

/// The full reference table.
pub fn reference_cases() -> Vec<ReferenceCase> {
    use DarkEnergy::*;

    let lcdm = CosmologyParams::non_flat;
    let flat = CosmologyParams::flat;

    vec![
        ReferenceCase::new(
            "no-relativistic",
            lcdm(75.0, 0.25, 0.5),
            [2953.93001902, 4616.7134253, 5685.07765971, 6440.80611897],
        ),
        ReferenceCase::new(
            "massless-nu",
            massless(lcdm(75.0, 0.25, 0.6)),
            [3037.12620424, 4776.86236327, 5889.55164479, 6671.85418235],
        ),
        ReferenceCase::new(
            "massive-nu",
            massive(lcdm(75.0, 0.3, 0.4), 3.0, 10.0),
            [2471.80626824, 3567.1902565, 4207.15995626, 4638.20476018],
        ),
        ReferenceCase::new(
            "no-relativistic",
            flat(75.0, 0.25),
            [3180.83488552, 5060.82054204, 6253.6721173, 7083.5374303],
        ),
        ReferenceCase::new(
            "massless-nu",
            massless(flat(75.0, 0.25)),
            [3180.42662867, 5059.60529655, 6251.62766102, 7080.71698117],
        ),
        ReferenceCase::new(
            "massive-nu",
            massive(flat(75.0, 0.25), 3.0, 10.0),
            [2337.54183142, 3371.91131264, 3988.40711188, 4409.09346922],
        ),
        ReferenceCase::new(
            "no-relativistic",
            flat(75.0, 0.25).with_dark_energy(W { w0: -1.05 }),
            [3216.8296894, 5117.2097601, 6317.05995437, 7149.68648536],
        ),
        ReferenceCase::new(
            "massless-nu",
            massless(flat(75.0, 0.25).with_dark_energy(W { w0: -0.95 })),
            [3143.56537758, 5000.32196494, 6184.11444601, 7009.80166062],
        ),
        ReferenceCase::new(
            "massive-nu",
            massive(flat(75.0, 0.25).with_dark_energy(W { w0: -0.9 }), 3.0, 10.0),
            [2337.76035371, 3372.1971387, 3988.71362289, 4409.40817174],
        ),
        ReferenceCase::new(
            "no-relativistic",
            lcdm(75.0, 0.25, 0.4).with_dark_energy(W { w0: -0.9 }),
            [2849.6163356, 4428.71661565, 5450.97862778, 6179.37072324],
        ),
        ReferenceCase::new(
            "massless-nu",
            massless(lcdm(75.0, 0.25, 0.4).with_dark_energy(W { w0: -1.1 })),
            [2904.35580229, 4511.11471267, 5543.43643353, 6275.9206788],
        ),
        ReferenceCase::new(
            "massive-nu",
            massive(lcdm(75.0, 0.25, 0.4).with_dark_energy(W { w0: -0.9 }), 3.0, 10.0),
            [2473.32522734, 3581.54519631, 4232.41674426, 4671.83818117],
        ),
        ReferenceCase::new(
            "no-relativistic",
            lcdm(75.0, 0.3, 0.6).with_dark_energy(W0Wa { w0: -0.9, wa: 0.1 }),
            [2937.7807638, 4572.59950903, 5611.52821924, 6339.8549956],
        ),
        ReferenceCase::new(
            "massless-nu",
            massless(lcdm(75.0, 0.25, 0.5).with_dark_energy(W0Wa { w0: -0.9, wa: 0.1 })),
            [2907.34722624, 4539.01723198, 5593.51611281, 6342.3228444],
        ),
        ReferenceCase::new(
            "massive-nu",
            massive(
                lcdm(75.0, 0.25, 0.5).with_dark_energy(W0Wa { w0: -0.9, wa: 0.1 }),
                3.0,
                10.0,
            ),
            [2507.18336722, 3633.33231695, 4292.44746919, 4736.35404638],
        ),
        ReferenceCase::new(
            "no-relativistic",
            flat(75.0, 0.25).with_dark_energy(W0Wa { w0: -0.95, wa: 0.15 }),
            [3123.29892781, 4956.15204302, 6128.15563818, 6948.26480378],
        ),
        ReferenceCase::new(
            "massless-nu",
            massless(flat(75.0, 0.25).with_dark_energy(W0Wa { w0: -0.95, wa: 0.15 })),
            [3122.92671907, 4955.03768936, 6126.25719576, 6945.61856513],
        ),
        ReferenceCase::new(
            "massive-nu",
            massive(
                flat(75.0, 0.25).with_dark_energy(W0Wa { w0: -0.95, wa: 0.15 }),
                3.0,
                10.0,
            ),
            [2337.70072701, 3372.13719963, 3988.6571093, 4409.35399673],
        ),
        ReferenceCase::new(
            "no-relativistic",
            lcdm(75.0, 0.3, 0.6).with_dark_energy(WpWa {
                wp: -0.9,
                zp: 0.5,
                wa: 0.1,
            }),
            [2954.68975298, 4599.83254834, 5643.04013201, 6373.36147627],
        ),
        ReferenceCase::new(
            "massless-nu",
            massless(lcdm(75.0, 0.25, 0.5).with_dark_energy(WpWa {
                wp: -0.9,
                zp: 0.4,
                wa: 0.1,
            })),
            [2919.00656215, 4558.0218123, 5615.73412391, 6366.10224229],
        ),
        ReferenceCase::new(
            "massive-nu",
            massive(
                lcdm(75.0, 0.25, 0.5).with_dark_energy(WpWa {
                    wp: -0.9,
                    zp: 1.0,
                    wa: 0.1,
                }),
                4.0,
                5.0,
            ),
            [2629.48489827, 3874.13392319, 4614.31562397, 5116.51184842],
        ),
        ReferenceCase::new(
            "no-relativistic",
            lcdm(75.0, 0.3, 0.6).with_dark_energy(W0Wz { w0: -0.9, wz: 0.1 }),
            [3051.68786716, 4756.17714818, 5822.38084257, 6562.70873734],
        ),
        ReferenceCase::new(
            "massless-nu",
            massless(lcdm(75.0, 0.25, 0.5).with_dark_energy(W0Wz { w0: -0.9, wz: 0.1 })),
            [2997.8115653, 4686.45599916, 5764.54388557, 6524.17408738],
        ),
        ReferenceCase::new(
            "massive-nu",
            massive(
                lcdm(75.0, 0.25, 0.5).with_dark_energy(W0Wz { w0: -0.9, wz: 0.1 }),
                4.0,
                5.0,
            ),
            [2676.73467639, 3940.57967585, 4686.90810278, 5191.54178243],
        ),
        // Per-species masses exercise the vector neutrino density path.
        ReferenceCase::new(
            "m_nu=[10,0,0]",
            flat(75.0, 0.25).with_tcmb0(3.0).with_m_nu(vec![10.0, 0.0, 0.0]),
            [2777.71589173, 4186.91111666, 5046.0300719, 5636.10397302],
        ),
        ReferenceCase::new(
            "m_nu=[10,5,0]",
            flat(75.0, 0.25).with_tcmb0(3.0).with_m_nu(vec![10.0, 5.0, 0.0]),
            [2636.48149391, 3913.14102091, 4684.59108974, 5213.07557084],
        ),
        ReferenceCase::new(
            "m_nu=[4,5,9]",
            flat(75.0, 0.25).with_tcmb0(3.0).with_m_nu(vec![4.0, 5.0, 9.0]),
            [2563.5093049, 3776.63362071, 4506.83448243, 5006.50158829],
        ),
        ReferenceCase::new(
            "neff=4.2,m_nu=[1,4,5,9]",
            flat(75.0, 0.25)
                .with_tcmb0(3.0)
                .with_neff(4.2)
                .with_m_nu(vec![1.0, 4.0, 5.0, 9.0]),
            [2525.58017482, 3706.87633298, 4416.58398847, 4901.96669755],
        ),
    ]
}

/// Looks up a reference case by label.
pub fn reference_case(label: &str) -> Option<ReferenceCase> {
    reference_cases().into_iter().find(|case| case.label == label)
}
