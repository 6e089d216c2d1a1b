use crate::units::*;
use rand::Rng;

use super::collider::{resolve_collisions, Collider, ColliderTransform};
use super::error::ConfigurationError;
use super::parameters::SimulationParameters;
use super::particles::Particles;
use super::seeding::GridSeeding;
use super::smoothing_kernel;
use super::solver::MullerSolver;
use super::spatial_hash::{ParticleIndex, SpatialHash};
use super::timemanager::TimeManager;
use super::viscositymodel::PhysicalViscosityModel;

/// What happened during a single step.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct StepStatistics {
    pub timestep: Real,
    pub clamped_densities: usize,   // particles that had (near) zero density
    pub recovered_particles: usize, // particles reset after producing non-finite state
    pub collider_contacts: usize,
    pub max_speed: Real,
}

/// Weakly compressible SPH fluid interacting with a set of static colliders.
///
/// Owns all particle state. Every step runs the same phases, each one finished for all particles before the next begins:
/// refresh neighbors, density & pressure, forces, integration, collisions.
pub struct Simulation<H> {
    parameters: SimulationParameters,
    particles: Particles<H>,
    spatial_hash: SpatialHash,
    colliders: Vec<Collider>,

    density_kernel: smoothing_kernel::Poly6,
    solver: MullerSolver<PhysicalViscosityModel>,

    step_count: u64,
}

impl<H> Simulation<H> {
    pub fn new(parameters: SimulationParameters, positions_and_handles: impl IntoIterator<Item = (Point, H)>) -> Result<Simulation<H>, ConfigurationError> {
        parameters.validate()?;
        let particles = Particles::new(positions_and_handles);
        if particles.is_empty() {
            return Err(ConfigurationError::NoParticles);
        }
        if let Some(p) = particles.positions.iter().find(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite())) {
            log::error!("rejecting non-finite initial position {:?}", p);
            return Err(ConfigurationError::NonFiniteParameter { name: "initial position" });
        }

        let mut spatial_hash = SpatialHash::new(parameters.cell_size);
        for (pidx, position) in particles.positions.iter().enumerate() {
            // Indices are unique, so this can't fail.
            let _ = spatial_hash.insert(*position, pidx as ParticleIndex);
        }

        log::info!(
            "created fluid simulation with {} particles (h = {}, cell size = {}, dt = {})",
            particles.len(),
            parameters.smoothing_radius,
            parameters.cell_size,
            parameters.timestep
        );

        Ok(Simulation {
            density_kernel: smoothing_kernel::Poly6::new(parameters.smoothing_radius),
            solver: MullerSolver::new(
                PhysicalViscosityModel::new(parameters.smoothing_radius, parameters.viscosity),
                parameters.smoothing_radius,
            ),
            parameters,
            particles,
            spatial_hash,
            colliders: Vec::new(),
            step_count: 0,
        })
    }

    /// Seeds particles on a jittered grid. `make_handle` receives index and initial position of each particle.
    pub fn from_seeding(
        parameters: SimulationParameters,
        seeding: &GridSeeding,
        rng: &mut impl Rng,
        mut make_handle: impl FnMut(usize, Point) -> H,
    ) -> Result<Simulation<H>, ConfigurationError> {
        seeding.validate()?;
        let positions = seeding.positions(rng);
        Self::new(
            parameters,
            positions.into_iter().enumerate().map(|(i, p)| (p, make_handle(i, p))),
        )
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    pub fn particles(&self) -> &Particles<H> {
        &self.particles
    }

    pub fn spatial_hash(&self) -> &SpatialHash {
        &self.spatial_hash
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Replaces all colliders. They stay in effect until replaced again.
    pub fn set_colliders(&mut self, colliders: impl IntoIterator<Item = Collider>) {
        self.colliders.clear();
        self.colliders.extend(colliders);
    }

    /// Replaces all colliders with fresh snapshots of the host's transforms. Meant to be called before every step if colliders move.
    pub fn refresh_colliders(&mut self, transforms: &[ColliderTransform]) {
        self.set_colliders(transforms.iter().map(Collider::from));
    }

    /// Overrides a particle's velocity, e.g. to give the fluid an initial push.
    ///
    /// # Panics
    /// If `i` is not a valid particle index.
    pub fn set_velocity(&mut self, i: usize, velocity: Vector) {
        self.particles.velocities[i] = velocity;
    }

    /// Advances the simulation by `dt` seconds.
    pub fn step(&mut self, dt: Real) -> StepStatistics {
        microprofile::scope!("Simulation", "step");

        self.refresh_neighbors();
        self.compute_density_pressure();
        self.compute_forces();
        let integration = self.solver.integrate(&mut self.particles, dt);
        let collider_contacts = self.resolve_collisions();

        self.step_count += 1;
        let statistics = StepStatistics {
            timestep: dt,
            clamped_densities: integration.clamped_densities,
            recovered_particles: integration.recovered_particles,
            collider_contacts,
            max_speed: self.particles.max_speed(),
        };

        if statistics.clamped_densities > 0 || statistics.recovered_particles > 0 {
            log::warn!(
                "step {}: clamped density of {} particles, reset {} particles with non-finite state",
                self.step_count,
                statistics.clamped_densities,
                statistics.recovered_particles
            );
        }
        log::debug!("step {}: {:?}", self.step_count, statistics);
        statistics
    }

    /// Steps with the time manager's current timestep and lets it pick the next one.
    pub fn advance(&mut self, time_manager: &mut TimeManager) -> StepStatistics {
        let statistics = self.step(time_manager.timestep());
        time_manager.update_time();
        time_manager.update_timestep(self.parameters.particle_radius * 2.0, statistics.max_speed);
        statistics
    }

    fn refresh_neighbors(&mut self) {
        microprofile::scope!("Simulation", "refresh_neighbors");
        for (pidx, position) in self.particles.positions.iter().enumerate() {
            self.spatial_hash.update_position(*position, pidx as ParticleIndex);
        }
    }

    fn compute_density_pressure(&mut self) {
        self.particles.update_densities_and_pressures(
            &self.spatial_hash,
            self.density_kernel,
            self.parameters.smoothing_radius,
            self.parameters.particle_mass,
            self.parameters.gas_constant,
            self.parameters.rest_density,
        );
    }

    fn compute_forces(&mut self) {
        self.solver.update_forces(&mut self.particles, &self.spatial_hash, &self.parameters);
    }

    fn resolve_collisions(&mut self) -> usize {
        resolve_collisions(
            &mut self.particles,
            &self.colliders,
            self.parameters.particle_radius,
            self.parameters.drag,
            self.parameters.boundary_damping,
        )
    }

    /// Hands every particle's handle and current state to the host.
    pub fn publish(&self, mut f: impl FnMut(&H, Point, Vector)) {
        for ((handle, position), velocity) in self
            .particles
            .handles()
            .iter()
            .zip(self.particles.positions.iter())
            .zip(self.particles.velocities.iter())
        {
            f(handle, *position, *velocity);
        }
    }

    pub fn positions(&self) -> &[Point] {
        &self.particles.positions
    }

    pub fn total_momentum(&self) -> Vector {
        self.particles.total_momentum(self.parameters.particle_mass)
    }

    pub fn kinetic_energy(&self) -> Real {
        self.particles.kinetic_energy(self.parameters.particle_mass)
    }

    pub fn max_speed(&self) -> Real {
        self.particles.max_speed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use more_asserts::*;

    fn quiet_parameters() -> SimulationParameters {
        SimulationParameters {
            gravity_multiplier: 0.0,
            viscosity: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn rejects_invalid_configuration() {
        let parameters = SimulationParameters {
            smoothing_radius: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Simulation::new(parameters, vec![(Point::new(0.0, 0.0, 0.0), ())]),
            Err(ConfigurationError::NonPositiveSmoothingRadius(_))
        ));
        assert!(matches!(
            Simulation::<()>::new(SimulationParameters::default(), vec![]),
            Err(ConfigurationError::NoParticles)
        ));
        assert!(matches!(
            Simulation::new(SimulationParameters::default(), vec![(Point::new(Real::NAN, 0.0, 0.0), ())]),
            Err(ConfigurationError::NonFiniteParameter { .. })
        ));
    }

    #[test]
    fn seeding_registers_all_particles() {
        let mut rng: rand::rngs::SmallRng = rand::SeedableRng::seed_from_u64(1);
        let simulation = Simulation::from_seeding(SimulationParameters::default(), &GridSeeding::default(), &mut rng, |i, _| i).unwrap();
        assert_eq!(simulation.particles().len(), 250);
        assert_eq!(simulation.spatial_hash().len(), 250);
        assert_eq!(simulation.particles().handles()[17], 17);
    }

    #[test]
    fn hash_follows_particles() {
        let mut simulation = Simulation::new(quiet_parameters(), vec![(Point::new(0.5, 0.5, 0.5), ())]).unwrap();
        simulation.set_velocity(0, Vector::new(1000.0, 0.0, 0.0));
        simulation.step(0.001);
        let moved_to = simulation.positions()[0];
        // refresh happens at the beginning of each step
        simulation.step(0.001);
        let cell = simulation.spatial_hash().cell_at(moved_to);
        assert_eq!(simulation.spatial_hash().cell_of(0), Some(cell));
        assert_eq!(cell.x, 1);
    }

    #[test]
    fn falling_particle_lands_on_floor() {
        let parameters = SimulationParameters {
            gravity_multiplier: 1.0,
            viscosity: 0.0,
            particle_radius: 0.2,
            ..Default::default()
        };
        let mut simulation = Simulation::new(parameters, vec![(Point::new(0.0, 1.0, 0.0), ())]).unwrap();
        simulation.refresh_colliders(&[ColliderTransform {
            position: Point::new(0.0, 0.0, 0.0),
            right: Vector::unit_x(),
            up: Vector::unit_z(),
            lossy_scale: Vector::new(10.0, 10.0, 1.0),
        }]);

        let mut contacts = 0;
        for _ in 0..2000 {
            contacts += simulation.step(0.005).collider_contacts;
        }
        assert_gt!(contacts, 0);
        assert_ge!(simulation.positions()[0].y, 0.1 - 1e-4);
        assert_lt!(simulation.positions()[0].y, 0.2);
    }

    #[test]
    fn zero_mass_is_recovered_locally() {
        let parameters = SimulationParameters {
            particle_mass: 0.0,
            ..Default::default()
        };
        let mut simulation = Simulation::new(parameters, vec![(Point::new(0.0, 0.0, 0.0), ())]).unwrap();
        let statistics = simulation.step(0.001);
        assert_eq!(statistics.clamped_densities, 1);
        assert!(simulation.positions()[0].y.is_finite());
        assert_eq!(simulation.step_count(), 1);
    }

    #[test]
    fn publish_reports_handles_with_state() {
        let mut simulation = Simulation::new(
            quiet_parameters(),
            vec![(Point::new(0.0, 0.0, 0.0), "a"), (Point::new(10.0, 0.0, 0.0), "b")],
        )
        .unwrap();
        simulation.set_velocity(1, Vector::new(0.0, 1.0, 0.0));
        simulation.step(0.5);

        let mut published = Vec::new();
        simulation.publish(|handle, position, velocity| published.push((*handle, position, velocity)));
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].0, "a");
        assert_eq!(published[1], ("b", Point::new(10.0, 0.5, 0.0), Vector::new(0.0, 1.0, 0.0)));
    }

    #[test]
    #[should_panic]
    fn set_velocity_out_of_range_panics() {
        let mut simulation = Simulation::new(quiet_parameters(), vec![(Point::new(0.0, 0.0, 0.0), ())]).unwrap();
        simulation.set_velocity(1, Vector::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn advance_uses_time_manager() {
        let mut simulation = Simulation::new(quiet_parameters(), vec![(Point::new(0.0, 0.0, 0.0), ())]).unwrap();
        let mut time = TimeManager::fixed(0.002);
        for _ in 0..5 {
            let statistics = simulation.advance(&mut time);
            assert_eq!(statistics.timestep, 0.002);
        }
        assert_eq!(time.num_steps(), 5);
        assert_eq!(simulation.step_count(), 5);
        assert_lt!((time.passed_time() - 0.01).abs(), 1e-6);
    }
}
