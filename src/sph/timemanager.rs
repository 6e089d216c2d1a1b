use crate::units::*;

pub enum TimeManagerConfiguration {
    FixedTimeStep(Real),

    // Step length follows the CFL condition: short steps while particles move fast, long steps otherwise.
    AdaptiveTimeStep {
        timestep_max: Real,
        // Lower bound independent of the CFL condition, keeps a few runaway particles from stalling the simulation.
        timestep_min: Real,
        // Values above 1 allow larger steps than the CFL condition suggests.
        cfl_factor: Real,
    },
}

// All timing values in seconds
pub struct TimeManager {
    passed_time: Real,
    timestep: Real,
    num_steps: u64,
    config: TimeManagerConfiguration,
}

impl TimeManager {
    pub fn new(config: TimeManagerConfiguration) -> TimeManager {
        let mut instance = TimeManager {
            passed_time: 0.0,
            timestep: 0.0,
            num_steps: 0,
            config,
        };
        instance.restart();
        instance
    }

    pub fn fixed(timestep: Real) -> TimeManager {
        Self::new(TimeManagerConfiguration::FixedTimeStep(timestep))
    }

    pub fn restart(&mut self) {
        self.passed_time = 0.0;
        self.num_steps = 0;
        self.timestep = match self.config {
            TimeManagerConfiguration::FixedTimeStep(timestep) => timestep,
            // Start cautious, adaptive stepping may only grow gradually.
            TimeManagerConfiguration::AdaptiveTimeStep { timestep_min, .. } => timestep_min,
        }
    }

    // how much physical time has passed in the simulation
    pub fn passed_time(&self) -> Real {
        self.passed_time
    }

    // length of the upcoming step
    pub fn timestep(&self) -> Real {
        self.timestep
    }

    pub fn num_steps(&self) -> u64 {
        self.num_steps
    }

    pub fn config(&self) -> &TimeManagerConfiguration {
        &self.config
    }

    /// Picks the length of the next step from the fastest particle.
    pub(super) fn update_timestep(&mut self, particle_diameter: Real, max_velocity: Real) {
        self.timestep = match self.config {
            TimeManagerConfiguration::FixedTimeStep(timestep) => timestep,
            TimeManagerConfiguration::AdaptiveTimeStep {
                timestep_max,
                timestep_min,
                cfl_factor,
            } => {
                const VELOCITY_EPSILON: Real = 0.00001;
                // Courant–Friedrichs–Lewy: no particle should travel more than a fraction of its diameter per step.
                let time_cfl = cfl_factor * 0.4 * particle_diameter / (max_velocity + VELOCITY_EPSILON);
                // Growing too fast makes the step oscillate after impacts (velocity flips through zero -> huge step -> explosion).
                let upper_bound = timestep_max.min(self.timestep * 2.0);
                timestep_min.max(upper_bound.min(time_cfl))
            }
        }
    }

    pub(super) fn update_time(&mut self) {
        self.passed_time += self.timestep;
        self.num_steps += 1;
    }
}
