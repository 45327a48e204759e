//! Host-side integration and property tests for the stopwatch control loop

#[cfg(test)]
mod input_properties;
#[cfg(test)]
mod pin_level_tests;
#[cfg(test)]
mod scenario_tests;
