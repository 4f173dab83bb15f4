//! Physical constants available to expressions.
//!
//! Values are CODATA SI values. Every entry can be referenced by name inside an
//! expression (`2*m_e*c**2`) and inserted from the keypad.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::f64::consts::PI;

/// A named physical constant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicalConstant {
    /// Identifier used in expressions.
    pub name: &'static str,
    /// Value in SI units.
    pub value: f64,
    /// Short human-readable description, including the unit.
    pub description: &'static str,
}

const fn constant(name: &'static str, value: f64, description: &'static str) -> PhysicalConstant {
    PhysicalConstant {
        name,
        value,
        description,
    }
}

/// The full constant table, in keypad order.
pub const CONSTANTS: [PhysicalConstant; 17] = [
    constant("c", 2.99792458e8, "speed of light in vacuum (m/s)"),
    constant("h", 6.62607015e-34, "Planck constant (J s)"),
    constant("hbar", 1.054571817e-34, "reduced Planck constant (J s)"),
    constant("k_B", 1.380649e-23, "Boltzmann constant (J/K)"),
    constant("eV", 1.602176634e-19, "electronvolt (J)"),
    constant("q_e", 1.602176634e-19, "elementary charge (C)"),
    constant("N_A", 6.02214076e23, "Avogadro constant (1/mol)"),
    constant("R", 8.314462618, "molar gas constant (J/(mol K))"),
    constant("R_m", 8.314462618, "molar gas constant, alias of R (J/(mol K))"),
    constant("R_inf", 1.0973731568160e7, "Rydberg constant (1/m)"),
    constant("mu0", 4.0 * PI * 1e-7, "vacuum magnetic permeability (N/A^2)"),
    constant("eps0", 8.8541878128e-12, "vacuum electric permittivity (F/m)"),
    constant("G", 6.67430e-11, "Newtonian constant of gravitation (m^3/(kg s^2))"),
    constant("m_e", 9.1093837015e-31, "electron mass (kg)"),
    constant("m_p", 1.67262192369e-27, "proton mass (kg)"),
    constant("m_n", 1.67492749804e-27, "neutron mass (kg)"),
    constant("a0", 5.29177210903e-11, "Bohr radius (m)"),
];

lazy_static! {
    static ref BY_NAME: HashMap<&'static str, f64> =
        CONSTANTS.iter().map(|c| (c.name, c.value)).collect();
}

/// Look up a constant value by its exact (case-sensitive) name.
pub fn lookup(name: &str) -> Option<f64> {
    BY_NAME.get(name).copied()
}

/// Check whether `name` is a constant from the table.
pub fn is_constant(name: &str) -> bool {
    BY_NAME.contains_key(name)
}
